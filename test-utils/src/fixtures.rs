//! KV v2 response fixtures.
//!
//! Bodies mirror what a Vault dev server returns for
//! `GET /v1/{mount}/data/{path}`.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};

/// Token the dev-mode fixture expects.
pub const DEV_TOKEN: &str = "dev-only-token";
/// Mount of the dev-mode fixture.
pub const DEV_MOUNT: &str = "secret";
/// Path of the dev-mode fixture.
pub const DEV_PATH: &str = "my-secret-password";
/// Password stored in the dev-mode fixture.
pub const DEV_PASSWORD: &str = "Hashi123";

/// Fixed creation time so bodies are deterministic.
#[must_use]
pub fn created_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 22, 2, 24, 6)
        .single()
        .unwrap_or_default()
}

/// Full KV v2 read response wrapping `data` at `version`.
#[must_use]
pub fn kv2_response(data: Value, version: u32) -> Value {
    json!({
        "request_id": "4f8e1c2a-0000-4000-8000-000000000001",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 0,
        "data": {
            "data": data,
            "metadata": {
                "created_time": created_time().to_rfc3339(),
                "custom_metadata": null,
                "deletion_time": "",
                "destroyed": false,
                "version": version
            }
        },
        "wrap_info": null,
        "warnings": null,
        "auth": null
    })
}

/// Response for a soft-deleted current version: metadata but `data: null`.
#[must_use]
pub fn kv2_deleted_response(version: u32) -> Value {
    json!({
        "request_id": "4f8e1c2a-0000-4000-8000-000000000002",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 0,
        "data": {
            "data": null,
            "metadata": {
                "created_time": created_time().to_rfc3339(),
                "custom_metadata": null,
                "deletion_time": created_time().to_rfc3339(),
                "destroyed": false,
                "version": version
            }
        },
        "warnings": null
    })
}

/// Vault error body.
#[must_use]
pub fn error_body(messages: &[&str]) -> Value {
    json!({ "errors": messages })
}

/// The dev-mode secret with the expected password.
#[must_use]
pub fn dev_secret() -> Value {
    json!({ "password": DEV_PASSWORD })
}

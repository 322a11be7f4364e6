//! Shared proptest generators for secret data.

use proptest::prelude::*;
use serde_json::{Value, json};

/// Generate printable secret values.
pub fn secret_value_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9!@#$%^&*]{8,64}"
}

/// Generate Vault tokens in the `hvs.` service-token shape.
pub fn vault_token_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{24}".prop_map(|body| format!("hvs.{body}"))
}

/// Generate KV field names.
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{2,15}"
}

/// Generate secret paths of one to three segments.
pub fn secret_path_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("my-secret-password".to_string()),
        Just("apps/web/db".to_string()),
        prop::collection::vec("[a-z][a-z0-9-]{2,10}", 1..4).prop_map(|segments| segments.join("/")),
    ]
}

/// Generate JSON values that are never strings.
pub fn non_string_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1.0e6f64..1.0e6).prop_map(|f| json!(f)),
        prop::collection::vec(any::<u8>(), 0..4).prop_map(|v| json!(v)),
        ("[a-z]{1,8}", any::<i32>()).prop_map(|(k, v)| json!({ k: v })),
    ]
}

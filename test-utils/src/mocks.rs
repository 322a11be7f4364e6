//! Mock Vault server for integration tests.
//!
//! Wraps a [`wiremock::MockServer`] and mounts KV v2 endpoints the way a
//! Vault dev server would answer them.

use crate::fixtures::{error_body, kv2_deleted_response, kv2_response};
use serde_json::Value;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN_HEADER: &str = "x-vault-token";

/// A running mock Vault server.
pub struct MockVault {
    server: MockServer,
}

impl MockVault {
    /// Start a mock server on a random local port.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base address to point a client at.
    #[must_use]
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    fn data_path(mount: &str, secret_path: &str) -> String {
        format!("/v1/{mount}/data/{secret_path}")
    }

    /// Serve `data` at `mount`/`secret_path` to requests carrying `token`.
    ///
    /// Requests with a missing or different token get a 403.
    pub async fn mount_secret(
        &self,
        mount: &str,
        secret_path: &str,
        token: &str,
        data: Value,
        version: u32,
    ) {
        let route = Self::data_path(mount, secret_path);

        Mock::given(method("GET"))
            .and(path(route.as_str()))
            .and(header(TOKEN_HEADER, token))
            .respond_with(ResponseTemplate::new(200).set_body_json(kv2_response(data, version)))
            .with_priority(1)
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path(route.as_str()))
            .respond_with(ResponseTemplate::new(403).set_body_json(error_body(&["permission denied"])))
            .with_priority(10)
            .mount(&self.server)
            .await;
    }

    /// Serve `data` only when `?version=N` is requested.
    pub async fn mount_secret_version(
        &self,
        mount: &str,
        secret_path: &str,
        version: u32,
        data: Value,
    ) {
        Mock::given(method("GET"))
            .and(path(Self::data_path(mount, secret_path).as_str()))
            .and(query_param("version", version.to_string().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(kv2_response(data, version)))
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Serve a soft-deleted current version: 404 with the version metadata.
    pub async fn mount_deleted(&self, mount: &str, secret_path: &str, version: u32) {
        Mock::given(method("GET"))
            .and(path(Self::data_path(mount, secret_path).as_str()))
            .respond_with(ResponseTemplate::new(404).set_body_json(kv2_deleted_response(version)))
            .mount(&self.server)
            .await;
    }

    /// Answer `mount`/`secret_path` with a bare status and Vault error body.
    pub async fn mount_status(&self, mount: &str, secret_path: &str, status: u16, messages: &[&str]) {
        Mock::given(method("GET"))
            .and(path(Self::data_path(mount, secret_path).as_str()))
            .respond_with(ResponseTemplate::new(status).set_body_json(error_body(messages)))
            .mount(&self.server)
            .await;
    }

    /// Serve `data` after `delay`.
    pub async fn mount_delayed(&self, mount: &str, secret_path: &str, data: Value, delay: Duration) {
        Mock::given(method("GET"))
            .and(path(Self::data_path(mount, secret_path).as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(kv2_response(data, 1))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Serve a raw, non-JSON body with status 200.
    pub async fn mount_raw(&self, mount: &str, secret_path: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(Self::data_path(mount, secret_path).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Number of requests the server has seen.
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }
}

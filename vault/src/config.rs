//! Fetcher configuration.
//!
//! Defaults reproduce the dev-mode fixture: a KV v2 engine mounted at
//! `secret` holding `my-secret-password` with a `password` field. They are
//! compiled in; nothing is read from the environment.

use secrecy::SecretString;
use std::time::Duration;

/// Default Vault server address.
pub const DEFAULT_ADDR: &str = "https://vault.service.consul:8200";
/// Default static token.
pub const DEFAULT_TOKEN: &str = "dev-only-token";
/// Default KV v2 mount.
pub const DEFAULT_MOUNT: &str = "secret";
/// Default secret path under the mount.
pub const DEFAULT_PATH: &str = "my-secret-password";
/// Default field to check inside the secret.
pub const DEFAULT_FIELD: &str = "password";
/// Default expected field value.
pub const DEFAULT_EXPECTED: &str = "Hashi123";

/// Everything one fetch-and-validate run needs.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Vault server address
    pub addr: String,
    /// Static token sent as `X-Vault-Token`
    pub token: SecretString,
    /// KV v2 mount path
    pub mount: String,
    /// Secret path under the mount
    pub path: String,
    /// Field to extract from the secret data
    pub field: String,
    /// Value the field must hold
    pub expected: SecretString,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            token: SecretString::from(DEFAULT_TOKEN),
            mount: DEFAULT_MOUNT.to_string(),
            path: DEFAULT_PATH.to_string(),
            field: DEFAULT_FIELD.to_string(),
            expected: SecretString::from(DEFAULT_EXPECTED),
            timeout: None,
        }
    }
}

impl FetcherConfig {
    /// Create a configuration for the given address with default everything else.
    #[must_use]
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            ..Default::default()
        }
    }

    /// Set the static token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = SecretString::from(token.into());
        self
    }

    /// Set the KV v2 mount.
    #[must_use]
    pub fn with_mount(mut self, mount: impl Into<String>) -> Self {
        self.mount = mount.into();
        self
    }

    /// Set the secret path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the field to check.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Set the expected value.
    #[must_use]
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = SecretString::from(expected.into());
        self
    }

    /// Set a per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

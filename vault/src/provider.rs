//! Secret reader abstraction.
//!
//! The fetcher only needs "read the current KV v2 version at mount/path".
//! Anything that can answer that, an in-memory store in tests included,
//! can stand in for the HTTP client.

use crate::{client::VaultClient, error::ReadError, secrets::KvSecret};
use async_trait::async_trait;

/// Source of KV v2 secrets.
#[async_trait]
pub trait SecretReader: Send + Sync {
    /// Read the current version of the secret at `path` under `mount`.
    async fn read_kv2(&self, mount: &str, path: &str) -> Result<KvSecret, ReadError>;
}

#[async_trait]
impl SecretReader for VaultClient {
    async fn read_kv2(&self, mount: &str, path: &str) -> Result<KvSecret, ReadError> {
        self.kv2(mount).get(path).await
    }
}

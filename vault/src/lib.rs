//! HashiCorp Vault KV v2 secret fetcher.
//!
//! Builds a client for a Vault address, authenticates with a static token,
//! reads the current version of one KV v2 secret and checks that one of its
//! fields holds an expected string.
//!
//! ```no_run
//! use vault_kv_fetcher::{FetcherConfig, SecretFetcher};
//!
//! # async fn run() -> Result<(), vault_kv_fetcher::FetchError> {
//! let config = FetcherConfig::new("http://127.0.0.1:8200").with_token("root");
//! let granted = SecretFetcher::new(config).fetch_and_validate().await?;
//! println!("checked version {:?}", granted.version);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod fetcher;
pub mod provider;
pub mod secrets;

pub use client::{Kv2, VaultClient};
pub use config::FetcherConfig;
pub use decode::{DecodeError, JsonKind};
pub use error::{ClientInitError, ErrorKind, FetchError, FetchResult, ReadError};
pub use fetcher::{AccessGranted, SecretFetcher};
pub use provider::SecretReader;
pub use secrets::{KvMetadata, KvSecret};

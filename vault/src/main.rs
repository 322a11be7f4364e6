//! Checks the Vault KV v2 secret compiled into [`FetcherConfig::default`]
//! and exits non-zero on any failure.
//!
//! Only log output is adjustable at runtime (`RUST_LOG`, `LOG_LEVEL`,
//! `LOG_FORMAT=json`); the secret coordinates are fixed.

use rust_common::{TracingConfig, init_tracing};
use tracing::{error, info};
use vault_kv_fetcher::{FetcherConfig, SecretFetcher};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing(&TracingConfig::from_env().with_service_name("vault-kv-fetch"));

    let config = FetcherConfig::default();
    info!(addr = %config.addr, mount = %config.mount, path = %config.path, "Checking secret");

    let granted = SecretFetcher::new(config)
        .fetch_and_validate()
        .await
        .inspect_err(|e| error!(kind = ?e.kind(), error = %e, "Secret check failed"))?;

    info!(version = ?granted.version, "Secret check passed");
    println!("Access granted!");
    Ok(())
}

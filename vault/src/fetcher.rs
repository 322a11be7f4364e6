//! Fetch one KV v2 secret and validate one of its fields.

use crate::{
    client::VaultClient,
    config::FetcherConfig,
    decode,
    error::{FetchError, FetchResult, ReadError},
    provider::SecretReader,
    secrets::KvSecret,
};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use subtle::ConstantTimeEq;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Proof of a successful check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGranted {
    /// Mount the secret was read from
    pub mount: String,
    /// Secret path under the mount
    pub path: String,
    /// Version that was checked, when the server reported one
    pub version: Option<u32>,
}

/// Builds a client per run, reads the configured secret and checks the field.
#[derive(Debug, Clone)]
pub struct SecretFetcher {
    config: FetcherConfig,
}

impl SecretFetcher {
    /// Create a fetcher for the given configuration.
    #[must_use]
    pub const fn new(config: FetcherConfig) -> Self {
        Self { config }
    }

    /// Build a token-bearing client for the configured address.
    ///
    /// # Errors
    ///
    /// [`FetchError::ClientInit`] if the address is malformed or the
    /// transport cannot be built.
    pub fn connect(&self) -> FetchResult<VaultClient> {
        Ok(VaultClient::from_config(&self.config)?)
    }

    /// Run the check against Vault with no deadline.
    ///
    /// # Errors
    ///
    /// One of the four [`FetchError`] kinds.
    pub async fn fetch_and_validate(&self) -> FetchResult<AccessGranted> {
        self.fetch_and_validate_until(None, &CancellationToken::new())
            .await
    }

    /// Run the check against Vault under a deadline and a cancellation token.
    ///
    /// Deadline expiry and cancellation surface as [`FetchError::SecretRead`].
    ///
    /// # Errors
    ///
    /// One of the four [`FetchError`] kinds.
    pub async fn fetch_and_validate_until(
        &self,
        deadline: Option<Duration>,
        cancel: &CancellationToken,
    ) -> FetchResult<AccessGranted> {
        let client = self.connect()?;
        self.run(&client, deadline, cancel).await
    }

    /// Run the check against any [`SecretReader`].
    ///
    /// # Errors
    ///
    /// [`FetchError::SecretRead`], [`FetchError::TypeMismatch`] or
    /// [`FetchError::Validation`].
    pub async fn fetch_and_validate_with<R>(&self, reader: &R) -> FetchResult<AccessGranted>
    where
        R: SecretReader + ?Sized,
    {
        self.run(reader, None, &CancellationToken::new()).await
    }

    #[instrument(
        skip(self, reader, cancel),
        fields(mount = %self.config.mount, path = %self.config.path)
    )]
    async fn run<R>(
        &self,
        reader: &R,
        deadline: Option<Duration>,
        cancel: &CancellationToken,
    ) -> FetchResult<AccessGranted>
    where
        R: SecretReader + ?Sized,
    {
        let secret = read_bounded(reader, &self.config, deadline, cancel)
            .await
            .inspect_err(|e| {
                warn!(error = %e, retryable = e.is_retryable(), "Secret read failed");
            })?;

        let value = decode::string_field(&secret.data, &self.config.field)?;
        self.validate(value)?;

        info!(version = ?secret.version(), "Access granted!");
        Ok(AccessGranted {
            mount: self.config.mount.clone(),
            path: self.config.path.clone(),
            version: secret.version(),
        })
    }

    fn validate(&self, value: String) -> FetchResult<()> {
        let matches: bool = value
            .as_bytes()
            .ct_eq(self.config.expected.expose_secret().as_bytes())
            .into();

        if matches {
            Ok(())
        } else {
            warn!(field = %self.config.field, "Retrieved value does not match");
            Err(FetchError::Validation {
                field: self.config.field.clone(),
                actual: SecretString::from(value),
            })
        }
    }
}

async fn read_bounded<R>(
    reader: &R,
    config: &FetcherConfig,
    deadline: Option<Duration>,
    cancel: &CancellationToken,
) -> Result<KvSecret, ReadError>
where
    R: SecretReader + ?Sized,
{
    if cancel.is_cancelled() {
        return Err(ReadError::Cancelled);
    }

    let read = async {
        let pending = reader.read_kv2(&config.mount, &config.path);
        match deadline {
            Some(limit) => tokio::time::timeout(limit, pending)
                .await
                .unwrap_or_else(|_| Err(ReadError::DeadlineExceeded(limit))),
            None => pending.await,
        }
    };

    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            debug!("Read cancelled by caller");
            Err(ReadError::Cancelled)
        }
        result = read => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticReader {
        data: Value,
        calls: AtomicUsize,
    }

    impl StaticReader {
        fn new(data: Value) -> Self {
            Self {
                data,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SecretReader for StaticReader {
        async fn read_kv2(&self, mount: &str, path: &str) -> Result<KvSecret, ReadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if mount != "secret" || path != "my-secret-password" {
                return Err(ReadError::not_found(format!("{mount}/data/{path}")));
            }
            match &self.data {
                Value::Object(map) => Ok(KvSecret::new(map.clone()).with_version(1)),
                _ => Err(ReadError::not_found(path)),
            }
        }
    }

    struct SlowReader;

    #[async_trait]
    impl SecretReader for SlowReader {
        async fn read_kv2(&self, _mount: &str, _path: &str) -> Result<KvSecret, ReadError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(KvSecret::default())
        }
    }

    fn fetcher() -> SecretFetcher {
        SecretFetcher::new(FetcherConfig::default())
    }

    #[tokio::test]
    async fn test_matching_password_granted() {
        let reader = StaticReader::new(json!({"password": "Hashi123"}));
        let granted = fetcher().fetch_and_validate_with(&reader).await.unwrap();
        assert_eq!(granted.path, "my-secret-password");
        assert_eq!(granted.version, Some(1));
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let reader = StaticReader::new(json!({"password": "WrongValue"}));
        let err = fetcher().fetch_and_validate_with(&reader).await.unwrap_err();
        match err {
            FetchError::Validation { field, actual } => {
                assert_eq!(field, "password");
                assert_eq!(actual.expose_secret(), "WrongValue");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_prefix_of_expected_rejected() {
        let reader = StaticReader::new(json!({"password": "Hashi"}));
        let err = fetcher().fetch_and_validate_with(&reader).await.unwrap_err();
        assert!(matches!(err, FetchError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_wrong_path_is_read_error() {
        let reader = StaticReader::new(json!({"password": "Hashi123"}));
        let config = FetcherConfig::default().with_path("other");
        let err = SecretFetcher::new(config)
            .fetch_and_validate_with(&reader)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::SecretRead(ReadError::NotFound(_))));
        assert_eq!(reader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_custom_field_and_expected() {
        let reader = StaticReader::new(json!({"api_key": "abc", "password": 1}));
        let config = FetcherConfig::default()
            .with_field("api_key")
            .with_expected("abc");
        assert!(
            SecretFetcher::new(config)
                .fetch_and_validate_with(&reader)
                .await
                .is_ok()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded() {
        let err = read_bounded(
            &SlowReader,
            &FetcherConfig::default(),
            Some(Duration::from_millis(50)),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ReadError::DeadlineExceeded(d) if d == Duration::from_millis(50)));
    }

    #[tokio::test]
    async fn test_cancelled_before_read() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let reader = StaticReader::new(json!({"password": "Hashi123"}));
        let err = read_bounded(&reader, &FetcherConfig::default(), None, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ReadError::Cancelled));
        assert_eq!(reader.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_during_read() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let err = read_bounded(&SlowReader, &FetcherConfig::default(), None, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ReadError::Cancelled));
    }

    #[test]
    fn test_connect_rejects_malformed_address() {
        let err = SecretFetcher::new(FetcherConfig::new("vault.service.consul:8200:bad"))
            .connect()
            .unwrap_err();
        assert!(matches!(err, FetchError::ClientInit(_)));
    }
}

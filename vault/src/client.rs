//! Vault HTTP client for KV v2 reads.

use crate::{
    config::FetcherConfig,
    error::{ClientInitError, ReadError},
    secrets::{ErrorBody, KvResponse, KvSecret},
};
use reqwest::Client;
use rust_common::{HttpConfig, build_http_client};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};
use url::Url;

const TOKEN_HEADER: &str = "X-Vault-Token";

/// Parse and check a Vault address.
///
/// # Errors
///
/// Rejects anything that is not an absolute `http`/`https` URL with a host.
pub fn parse_addr(addr: &str) -> Result<Url, ClientInitError> {
    let url = Url::parse(addr.trim())
        .map_err(|e| ClientInitError::invalid_address(addr, e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientInitError::invalid_address(
            addr,
            format!("unsupported scheme {:?}", url.scheme()),
        ));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ClientInitError::invalid_address(addr, "missing host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ClientInitError::invalid_address(
            addr,
            "query and fragment are not allowed",
        ));
    }

    Ok(url)
}

/// Vault client holding an address, an HTTP transport and a static token.
pub struct VaultClient {
    addr: Url,
    http: Client,
    token: Option<SecretString>,
}

impl std::fmt::Debug for VaultClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultClient")
            .field("addr", &self.addr.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl VaultClient {
    /// Create a client without a token.
    ///
    /// # Errors
    ///
    /// Fails if the address is malformed or the transport cannot be built.
    pub fn new(addr: &str, http_config: &HttpConfig) -> Result<Self, ClientInitError> {
        let addr = parse_addr(addr)?;
        let http = build_http_client(http_config).map_err(ClientInitError::Transport)?;

        Ok(Self {
            addr,
            http,
            token: None,
        })
    }

    /// Create a client from fetcher configuration, token included.
    ///
    /// # Errors
    ///
    /// Fails if the address is malformed or the transport cannot be built.
    pub fn from_config(config: &FetcherConfig) -> Result<Self, ClientInitError> {
        let mut http_config = HttpConfig::default();
        if let Some(timeout) = config.timeout {
            http_config = http_config.with_timeout(timeout);
        }

        let mut client = Self::new(&config.addr, &http_config)?;
        client.set_token(config.token.clone());
        Ok(client)
    }

    /// Set the token sent with every request.
    pub fn set_token(&mut self, token: SecretString) {
        self.token = Some(token);
    }

    /// Handle on the KV v2 engine mounted at `mount`.
    #[must_use]
    pub const fn kv2<'a>(&'a self, mount: &'a str) -> Kv2<'a> {
        Kv2 { client: self, mount }
    }

    fn api_url<'s>(&self, segments: impl IntoIterator<Item = &'s str>) -> Result<Url, ReadError> {
        let mut url = self.addr.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ReadError::InvalidPath(self.addr.to_string()))?;
            path.pop_if_empty().push("v1");
            for segment in segments {
                path.extend(segment.split('/').filter(|s| !s.is_empty()));
            }
        }
        Ok(url)
    }

    async fn get_json(&self, url: Url, display_path: &str) -> Result<Vec<u8>, ReadError> {
        let mut request = self.http.get(url).header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.header(TOKEN_HEADER, token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ReadError::unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ReadError::unavailable(e.to_string()))?;

        if status.is_success() {
            return Ok(body.to_vec());
        }
        // Vault answers a soft-deleted or destroyed version with 404 plus its metadata.
        if status.as_u16() == 404 && carries_version_metadata(&body) {
            debug!(path = display_path, "Current version is deleted");
            return Ok(body.to_vec());
        }

        let message = ErrorBody::parse(&body).message();
        warn!(path = display_path, status = status.as_u16(), %message, "Vault request failed");

        Err(match status.as_u16() {
            404 => ReadError::not_found(display_path),
            401 | 403 => ReadError::PermissionDenied(format!("{display_path}: {message}")),
            429 => ReadError::RateLimited,
            500..=599 => ReadError::unavailable(format!("Status {status}: {message}")),
            code => ReadError::UnexpectedStatus {
                status: code,
                path: display_path.to_string(),
                message,
            },
        })
    }
}

fn carries_version_metadata(body: &[u8]) -> bool {
    serde_json::from_slice::<KvResponse<Map<String, Value>>>(body)
        .ok()
        .and_then(|response| response.data)
        .is_some_and(|kv| kv.metadata.is_some())
}

/// KV v2 engine at a given mount.
#[derive(Debug, Clone, Copy)]
pub struct Kv2<'a> {
    client: &'a VaultClient,
    mount: &'a str,
}

impl Kv2<'_> {
    /// Read the current version of the secret at `path`.
    ///
    /// # Errors
    ///
    /// Any transport failure, non-success status or malformed body. A
    /// deleted current version is not an error: it comes back with empty
    /// data and its metadata.
    #[instrument(skip(self), fields(mount = %self.mount))]
    pub async fn get(&self, path: &str) -> Result<KvSecret, ReadError> {
        self.read(path, None).await
    }

    /// Read a specific version of the secret at `path`.
    ///
    /// # Errors
    ///
    /// Same as [`Kv2::get`].
    #[instrument(skip(self), fields(mount = %self.mount))]
    pub async fn get_version(&self, path: &str, version: u32) -> Result<KvSecret, ReadError> {
        self.read(path, Some(version)).await
    }

    async fn read(&self, path: &str, version: Option<u32>) -> Result<KvSecret, ReadError> {
        let mount = self.mount.trim_matches('/');
        let secret_path = path.trim_matches('/');
        if mount.is_empty() || secret_path.is_empty() {
            return Err(ReadError::InvalidPath(format!("{mount}/{secret_path}")));
        }
        let display_path = format!("{mount}/data/{secret_path}");

        let mut url = self.client.api_url([mount, "data", secret_path])?;
        if let Some(v) = version {
            url.query_pairs_mut().append_pair("version", &v.to_string());
        }

        debug!(path = %display_path, ?version, "Reading KV v2 secret");
        let body = self.client.get_json(url, &display_path).await?;

        let response: KvResponse<Map<String, Value>> = serde_json::from_slice(&body)?;
        let Some(kv) = response.data else {
            return Err(ReadError::not_found(display_path));
        };

        let secret = KvSecret {
            data: kv.data.unwrap_or_default(),
            metadata: kv.metadata.unwrap_or_default(),
        };
        debug!(path = %display_path, version = ?secret.version(), fields = secret.data.len(), "Read KV v2 secret");
        Ok(secret)
    }
}

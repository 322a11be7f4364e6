//! Fetcher error types using thiserror 2.0.
//!
//! [`FetchError`] has exactly four kinds, one per step that can fail:
//! building the client, reading the secret, decoding the field and
//! validating its value. None of them is retried.

use crate::decode::{DecodeError, JsonKind};
use secrecy::SecretString;
use std::time::Duration;
use thiserror::Error;

/// Client construction failures. Raised before any network traffic.
#[derive(Error, Debug)]
pub enum ClientInitError {
    /// The configured address is not a usable base URL
    #[error("invalid Vault address {addr:?}: {reason}")]
    InvalidAddress {
        /// Address as configured
        addr: String,
        /// Why it was rejected
        reason: String,
    },

    /// The HTTP transport could not be built
    #[error("unable to build HTTP transport: {0}")]
    Transport(#[source] reqwest::Error),
}

impl ClientInitError {
    /// Create an invalid address error.
    #[must_use]
    pub fn invalid_address(addr: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            addr: addr.into(),
            reason: reason.into(),
        }
    }
}

/// Failures of the remote KV v2 read.
#[derive(Error, Debug)]
pub enum ReadError {
    /// Vault server unreachable or answering 5xx
    #[error("Vault unavailable: {0}")]
    Unavailable(String),

    /// Token rejected or lacks policy for the path
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// No current version at the path
    #[error("Secret not found at path: {0}")]
    NotFound(String),

    /// Rate limited
    #[error("Rate limited")]
    RateLimited,

    /// Any other non-success status
    #[error("Unexpected status {status} for {path}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Request path
        path: String,
        /// Error messages returned by Vault
        message: String,
    },

    /// Mount or path cannot form a request URL
    #[error("Invalid secret path: {0}")]
    InvalidPath(String),

    /// Response body is not a KV v2 payload
    #[error("Malformed KV v2 response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The caller's deadline passed before Vault answered
    #[error("Deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    /// The caller cancelled the read
    #[error("Read cancelled")]
    Cancelled,
}

impl ReadError {
    /// Whether a later attempt could succeed. Only reported, never acted on.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::RateLimited | Self::DeadlineExceeded(_)
        )
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a secret not found error.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }
}

/// The four ways a fetch-and-validate run can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration or transport construction failed
    ClientInit,
    /// The remote read failed
    SecretRead,
    /// The field was absent or not of the expected type
    TypeMismatch,
    /// The field value did not match
    Validation,
}

/// Fetch-and-validate errors.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Client construction failed
    #[error("unable to initialize Vault client: {0}")]
    ClientInit(#[from] ClientInitError),

    /// Remote read failed
    #[error("unable to read secret: {0}")]
    SecretRead(#[from] ReadError),

    /// Field absent or not a string
    #[error("value type assertion failed for field {field:?}: {actual_type} {actual_value}")]
    TypeMismatch {
        /// Field name
        field: String,
        /// Kind of the value actually found
        actual_type: JsonKind,
        /// Rendered value actually found
        actual_value: String,
    },

    /// Field value did not match the expected value
    #[error("unexpected {field} value retrieved from vault")]
    Validation {
        /// Field name
        field: String,
        /// Value actually retrieved, kept out of Display
        actual: SecretString,
    },
}

impl FetchError {
    /// Tag identifying which step failed.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ClientInit(_) => ErrorKind::ClientInit,
            Self::SecretRead(_) => ErrorKind::SecretRead,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::Validation { .. } => ErrorKind::Validation,
        }
    }
}

impl From<DecodeError> for FetchError {
    fn from(err: DecodeError) -> Self {
        Self::TypeMismatch {
            field: err.field,
            actual_type: err.actual,
            actual_value: err.actual_value,
        }
    }
}

/// Result type for fetcher operations.
pub type FetchResult<T> = Result<T, FetchError>;

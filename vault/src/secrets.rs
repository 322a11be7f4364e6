//! KV v2 wire types and the in-memory secret handed to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Vault KV v2 read response wrapper.
///
/// Only `data` is read; lease and request bookkeeping fields are ignored.
#[derive(Debug, Deserialize)]
pub struct KvResponse<T> {
    /// Secret data and version metadata, absent on bare error bodies
    pub data: Option<KvData<T>>,
}

/// The `data` object of a KV v2 read.
///
/// `data` is `null` when the version has been deleted or destroyed; the
/// metadata is still present then.
#[derive(Debug, Deserialize)]
pub struct KvData<T> {
    /// Secret fields
    pub data: Option<T>,
    /// Version metadata
    #[serde(default)]
    pub metadata: Option<KvMetadata>,
}

/// Version metadata returned alongside KV v2 data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvMetadata {
    /// When this version was written
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
    /// Empty unless the version was soft-deleted
    #[serde(default)]
    pub deletion_time: String,
    /// Set once the version's data is gone for good
    #[serde(default)]
    pub destroyed: bool,
    /// Version number, starting at 1
    #[serde(default)]
    pub version: u32,
    /// Free-form key/value pairs set on the secret
    #[serde(default)]
    pub custom_metadata: Option<HashMap<String, String>>,
}

/// Error body Vault returns with non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    /// Messages in the order Vault reported them
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ErrorBody {
    /// Parse the body leniently; anything unparseable yields no messages.
    #[must_use]
    pub fn parse(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    /// Messages joined for display.
    #[must_use]
    pub fn message(&self) -> String {
        self.errors.join("; ")
    }
}

/// One version of a KV v2 secret.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KvSecret {
    /// Field name to dynamically typed value
    pub data: Map<String, Value>,
    /// Version metadata
    pub metadata: KvMetadata,
}

impl KvSecret {
    /// Wrap secret data with empty metadata.
    #[must_use]
    pub fn new(data: Map<String, Value>) -> Self {
        Self {
            data,
            metadata: KvMetadata::default(),
        }
    }

    /// Attach a version number.
    #[must_use]
    pub const fn with_version(mut self, version: u32) -> Self {
        self.metadata.version = version;
        self
    }

    /// Version number, if the server reported one.
    #[must_use]
    pub const fn version(&self) -> Option<u32> {
        if self.metadata.version == 0 {
            None
        } else {
            Some(self.metadata.version)
        }
    }
}

//! Shared test utilities for the Vault KV fetcher workspace.
//!
//! This crate provides:
//! - Proptest generators for secret data and paths
//! - A wiremock-backed mock Vault server
//! - KV v2 response fixtures

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod generators;
pub mod mocks;
pub mod fixtures;

pub use generators::*;

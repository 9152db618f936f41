//! S3 configuration.

use crate::error::{StorageError, StorageResult};

/// Environment variables that must be set for S3 access.
pub const REQUIRED_VARS: [&str; 4] = [
    "AWS_ACCESS_KEY_ID",
    "AWS_SECRET_ACCESS_KEY",
    "AWS_REGION",
    "AWS_S3_BUCKET",
];

/// Configuration for the S3 client.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Region
    pub region: String,
    /// Bucket name
    pub bucket_name: String,
    /// Custom endpoint for S3-compatible stores (path-style addressing)
    pub endpoint_url: Option<String>,
}

impl S3Config {
    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        let missing = Self::missing_vars();
        if !missing.is_empty() {
            return Err(StorageError::config_error(format!(
                "Missing environment variables: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            access_key_id: env_non_empty("AWS_ACCESS_KEY_ID").unwrap_or_default(),
            secret_access_key: env_non_empty("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
            region: env_non_empty("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            bucket_name: env_non_empty("AWS_S3_BUCKET").unwrap_or_default(),
            endpoint_url: env_non_empty("AWS_ENDPOINT_URL"),
        })
    }

    /// Names of required variables that are unset or empty.
    pub fn missing_vars() -> Vec<&'static str> {
        REQUIRED_VARS
            .into_iter()
            .filter(|name| env_non_empty(name).is_none())
            .collect()
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

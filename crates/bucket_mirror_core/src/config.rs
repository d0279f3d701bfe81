use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SOURCE_BUCKET: &str = "verified-prod-eu-central1";
pub const DEFAULT_DESTINATION_BUCKET: &str = "backup-prod-eu-central1";
pub const DEFAULT_SOURCE_REGION: &str = "eu-central-1";
pub const DEFAULT_DESTINATION_REGION: &str = "eu-west-2";
pub const MAX_LIST_PAGE_SIZE: u16 = 1_000;

pub const SOURCE_BUCKET_VAR: &str = "MIRROR_SOURCE_BUCKET";
pub const DESTINATION_BUCKET_VAR: &str = "MIRROR_DESTINATION_BUCKET";
pub const SOURCE_REGION_VAR: &str = "MIRROR_SOURCE_REGION";
pub const DESTINATION_REGION_VAR: &str = "MIRROR_DESTINATION_REGION";
pub const LIST_PAGE_SIZE_VAR: &str = "MIRROR_LIST_PAGE_SIZE";
pub const ENDPOINT_URL_VAR: &str = "MIRROR_S3_ENDPOINT";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{name} must be an integer between 1 and 1000, got '{value}'")]
    InvalidPageSize { name: &'static str, value: String },

    #[error("source and destination bucket must differ (both are '{0}')")]
    SameBucket(String),
}

/// Static settings for one mirror deployment, fixed for the life of the
/// process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MirrorConfig {
    pub source_bucket: String,
    pub destination_bucket: String,
    pub source_region: String,
    pub destination_region: String,
    /// Upper bound on objects per listing call. `None` keeps the store default.
    pub list_page_size: Option<u16>,
    /// Custom endpoint, used against S3-compatible stores such as LocalStack.
    pub endpoint_url: Option<String>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            source_bucket: DEFAULT_SOURCE_BUCKET.to_string(),
            destination_bucket: DEFAULT_DESTINATION_BUCKET.to_string(),
            source_region: DEFAULT_SOURCE_REGION.to_string(),
            destination_region: DEFAULT_DESTINATION_REGION.to_string(),
            list_page_size: None,
            endpoint_url: None,
        }
    }
}

impl MirrorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves the configuration from `lookup`, falling back to the built-in
    /// defaults for unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let value_or = |name: &str, fallback: String| lookup(name).unwrap_or(fallback);

        let list_page_size = match lookup(LIST_PAGE_SIZE_VAR) {
            Some(raw) => Some(parse_page_size(&raw)?),
            None => None,
        };
        let endpoint_url = lookup(ENDPOINT_URL_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let config = Self {
            source_bucket: value_or(SOURCE_BUCKET_VAR, defaults.source_bucket),
            destination_bucket: value_or(DESTINATION_BUCKET_VAR, defaults.destination_bucket),
            source_region: value_or(SOURCE_REGION_VAR, defaults.source_region),
            destination_region: value_or(DESTINATION_REGION_VAR, defaults.destination_region),
            list_page_size,
            endpoint_url,
        };
        config.validated()
    }

    pub fn validated(self) -> Result<Self, ConfigError> {
        let config = Self {
            source_bucket: non_empty(SOURCE_BUCKET_VAR, self.source_bucket)?,
            destination_bucket: non_empty(DESTINATION_BUCKET_VAR, self.destination_bucket)?,
            source_region: non_empty(SOURCE_REGION_VAR, self.source_region)?,
            destination_region: non_empty(DESTINATION_REGION_VAR, self.destination_region)?,
            ..self
        };

        if config.source_bucket == config.destination_bucket {
            return Err(ConfigError::SameBucket(config.source_bucket));
        }

        if let Some(size) = config.list_page_size {
            if size == 0 || size > MAX_LIST_PAGE_SIZE {
                return Err(ConfigError::InvalidPageSize {
                    name: LIST_PAGE_SIZE_VAR,
                    value: size.to_string(),
                });
            }
        }

        Ok(config)
    }
}

fn non_empty(name: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Empty(name));
    }
    Ok(trimmed.to_string())
}

fn parse_page_size(raw: &str) -> Result<u16, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidPageSize {
        name: LIST_PAGE_SIZE_VAR,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        move |name| values.get(name).cloned()
    }

    #[test]
    fn falls_back_to_built_in_defaults() {
        let config = MirrorConfig::from_lookup(lookup_from(&[])).expect("defaults are valid");
        assert_eq!(config, MirrorConfig::default());
        assert_eq!(config.source_region, "eu-central-1");
        assert_eq!(config.destination_region, "eu-west-2");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = MirrorConfig::from_lookup(lookup_from(&[
            (SOURCE_BUCKET_VAR, " photos-primary "),
            (DESTINATION_BUCKET_VAR, "photos-replica"),
            (DESTINATION_REGION_VAR, "us-east-1"),
            (LIST_PAGE_SIZE_VAR, "250"),
            (ENDPOINT_URL_VAR, "http://localhost:4566"),
        ]))
        .expect("overrides are valid");

        assert_eq!(config.source_bucket, "photos-primary");
        assert_eq!(config.destination_bucket, "photos-replica");
        assert_eq!(config.source_region, DEFAULT_SOURCE_REGION);
        assert_eq!(config.destination_region, "us-east-1");
        assert_eq!(config.list_page_size, Some(250));
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));
    }

    #[test]
    fn blank_endpoint_is_ignored() {
        let config = MirrorConfig::from_lookup(lookup_from(&[(ENDPOINT_URL_VAR, "  ")]))
            .expect("blank endpoint is allowed");
        assert_eq!(config.endpoint_url, None);
    }

    #[test]
    fn rejects_blank_bucket() {
        let error = MirrorConfig::from_lookup(lookup_from(&[(SOURCE_BUCKET_VAR, "   ")]))
            .expect_err("blank bucket should fail");
        assert_eq!(error, ConfigError::Empty(SOURCE_BUCKET_VAR));
    }

    #[test]
    fn rejects_identical_buckets() {
        let error = MirrorConfig::from_lookup(lookup_from(&[
            (SOURCE_BUCKET_VAR, "shared"),
            (DESTINATION_BUCKET_VAR, "shared"),
        ]))
        .expect_err("identical buckets should fail");
        assert_eq!(error, ConfigError::SameBucket("shared".to_string()));
    }

    #[test]
    fn rejects_out_of_range_page_size() {
        for raw in ["0", "1001", "ten", "-5"] {
            let error = MirrorConfig::from_lookup(lookup_from(&[(LIST_PAGE_SIZE_VAR, raw)]))
                .expect_err("page size should be rejected");
            assert!(error.to_string().contains(LIST_PAGE_SIZE_VAR), "{error}");
        }
    }

    #[test]
    fn validation_bounds_page_size_set_in_code() {
        let oversized = MirrorConfig {
            list_page_size: Some(1001),
            ..MirrorConfig::default()
        };
        assert_eq!(
            oversized.validated(),
            Err(ConfigError::InvalidPageSize {
                name: LIST_PAGE_SIZE_VAR,
                value: "1001".to_string(),
            })
        );

        let largest = MirrorConfig {
            list_page_size: Some(1000),
            ..MirrorConfig::default()
        };
        assert_eq!(largest.validated().map(|config| config.list_page_size), Ok(Some(1000)));
    }
}

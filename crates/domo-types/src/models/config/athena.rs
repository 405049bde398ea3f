//! Amazon Athena high-bandwidth connector config.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{optional_str, required_str, ConfigVariant, RawConfig};
use crate::error::ConfigError;

/// Region used when the API omits one.
pub const DEFAULT_ATHENA_REGION: &str = "us-west-2";

/// Credentials and staging location for the Athena high-bandwidth connector.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AthenaHighBandwidthConfig {
    /// AWS access key id
    pub aws_access_key: String,
    /// AWS secret access key
    pub aws_secret_key: String,
    /// S3 location where Athena stages query results
    pub s3_staging_dir: String,
    /// AWS region
    pub region: String,
}

impl AthenaHighBandwidthConfig {
    /// Create a config in the default region.
    pub fn new(
        aws_access_key: impl Into<String>,
        aws_secret_key: impl Into<String>,
        s3_staging_dir: impl Into<String>,
    ) -> Self {
        Self {
            aws_access_key: aws_access_key.into(),
            aws_secret_key: aws_secret_key.into(),
            s3_staging_dir: s3_staging_dir.into(),
            region: DEFAULT_ATHENA_REGION.to_string(),
        }
    }

    /// Override the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }
}

impl ConfigVariant for AthenaHighBandwidthConfig {
    const DATA_PROVIDER_TYPE: &'static str = "amazon-athena-high-bandwidth";

    fn decode(raw: &RawConfig) -> Result<Self, ConfigError> {
        let pt = Self::DATA_PROVIDER_TYPE;
        Ok(Self {
            aws_access_key: required_str(raw, pt, "awsAccessKey")?,
            aws_secret_key: required_str(raw, pt, "awsSecretKey")?,
            s3_staging_dir: required_str(raw, pt, "s3StagingDir")?,
            region: optional_str(raw, pt, "region", DEFAULT_ATHENA_REGION)?,
        })
    }

    fn encode(&self) -> RawConfig {
        let mut raw = RawConfig::new();
        raw.insert("awsAccessKey".into(), self.aws_access_key.clone().into());
        raw.insert("awsSecretKey".into(), self.aws_secret_key.clone().into());
        raw.insert("s3StagingDir".into(), self.s3_staging_dir.clone().into());
        raw.insert("region".into(), self.region.clone().into());
        raw
    }
}

impl fmt::Debug for AthenaHighBandwidthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AthenaHighBandwidthConfig")
            .field("aws_access_key", &self.aws_access_key)
            .field("aws_secret_key", &"<redacted>")
            .field("s3_staging_dir", &self.s3_staging_dir)
            .field("region", &self.region)
            .finish()
    }
}

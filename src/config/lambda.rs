#[cfg(feature = "lambda")]
use crate::config::toml_config::SiteConfig;
#[cfg(feature = "lambda")]
use crate::core::forms::{Envelope, DEFAULT_MAIL_FROM, DEFAULT_MAIL_TO};
#[cfg(feature = "lambda")]
use crate::core::Storage;
#[cfg(feature = "lambda")]
use crate::utils::error::{Result, SolarError};
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
#[cfg(feature = "lambda")]
use std::env;

#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub outbox_bucket: Option<String>,
    pub outbox_prefix: String,
    pub s3_region: String,
    pub site: SiteConfig,
}

#[cfg(feature = "lambda")]
impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        // 可選：SITE_CONFIG 指向打包進去的 TOML
        let mut site = match env::var("SITE_CONFIG") {
            Ok(path) => SiteConfig::from_file(path)?,
            Err(_) => SiteConfig::default(),
        };

        if let Ok(from) = env::var("MAIL_FROM") {
            site.envelope.from = from;
        }
        if let Ok(to) = env::var("MAIL_TO") {
            site.envelope.to = to;
        }

        Ok(Self {
            outbox_bucket: env::var("OUTBOX_BUCKET").ok(),
            outbox_prefix: env::var("OUTBOX_PREFIX").unwrap_or_else(|_| "forms".to_string()),
            s3_region: env::var("AWS_REGION_NAME").unwrap_or_else(|_| "eu-west-3".to_string()),
            site,
        })
    }

    pub fn envelope(&self) -> &Envelope {
        &self.site.envelope
    }

    pub fn uses_default_recipients(&self) -> bool {
        self.site.envelope.from == DEFAULT_MAIL_FROM && self.site.envelope.to == DEFAULT_MAIL_TO
    }
}

#[cfg(feature = "lambda")]
impl crate::utils::validation::Validate for LambdaConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        use crate::utils::validation::*;

        self.site.validate()?;

        // 驗證 S3 bucket 名稱
        let bucket = validate_required_field("OUTBOX_BUCKET", &self.outbox_bucket)?;
        validate_s3_bucket_name("OUTBOX_BUCKET", bucket)?;

        validate_non_empty_string("OUTBOX_PREFIX", &self.outbox_prefix)?;

        // 驗證區域
        validate_aws_region("AWS_REGION_NAME", &self.s3_region)?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

#[cfg(feature = "lambda")]
fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(SolarError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: reason.to_string(),
        })
    };

    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return reject("S3 bucket name must be between 3 and 63 characters");
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return reject(
            "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots",
        );
    }

    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return reject("S3 bucket name cannot start or end with a hyphen");
    }

    Ok(())
}

#[cfg(feature = "lambda")]
fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    crate::utils::validation::validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(SolarError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}

/// S3 上的 outbox：key 前綴固定，寫入失敗直接回報給 Mailer
#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
    prefix: String,
}

#[cfg(feature = "lambda")]
impl S3Storage {
    pub fn new(client: S3Client, bucket: String, prefix: String) -> Self {
        Self {
            client,
            bucket,
            prefix,
        }
    }

    fn key(&self, path: &str) -> String {
        format!("{}/{}", self.prefix.trim_end_matches('/'), path)
    }
}

#[cfg(feature = "lambda")]
impl Storage for S3Storage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(self.key(path))
            .send()
            .await
            .map_err(|e| SolarError::ConfigError {
                message: format!("Failed to read from S3: {}", e),
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| SolarError::ConfigError {
                message: format!("Failed to collect S3 data: {}", e),
            })?;

        Ok(data.into_bytes().to_vec())
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let key = self.key(path);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type("application/json")
            .body(data.to_vec().into())
            .send()
            .await
            .map_err(|e| SolarError::DeliveryError {
                message: format!("Failed to write s3://{}/{}: {}", self.bucket, key, e),
            })?;

        tracing::debug!("Stored s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

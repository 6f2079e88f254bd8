use crate::config::{non_blank, MonitorSettings};
use crate::utils::error::{MonitorError, Result};
use crate::utils::validation::{self, Validate};
use std::env;

pub const DEFAULT_S3_STATE_KEY: &str = "stock-watch/last_status.json";

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub settings: MonitorSettings,
    pub s3_bucket: String,
    pub s3_state_key: String,
    /// 未設定時沿用 SDK 預設（AWS_REGION）
    pub s3_region: Option<String>,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| non_blank(lookup(name));

        let url = var("MONITOR_URL").ok_or_else(|| MonitorError::MissingConfigError {
            field: "MONITOR_URL".to_string(),
        })?;

        let mut settings = MonitorSettings::new(url);
        settings.sender_email = var("SENDER_EMAIL");
        settings.sender_password = var("SENDER_PASSWORD");
        settings.recipient_email = var("RECIPIENT_EMAIL");
        if let Some(host) = var("SMTP_HOST") {
            settings.smtp_host = host;
        }
        settings.smtp_port = parse_var("SMTP_PORT", var("SMTP_PORT"), settings.smtp_port)?;
        settings.timeout_secs =
            parse_var("TIMEOUT_SECS", var("TIMEOUT_SECS"), settings.timeout_secs)?;
        settings.notify_on_cold_start =
            parse_var("NOTIFY_ON_COLD_START", var("NOTIFY_ON_COLD_START"), false)?;
        settings.notify_on_unknown =
            parse_var("NOTIFY_ON_UNKNOWN", var("NOTIFY_ON_UNKNOWN"), false)?;

        let s3_state_key =
            var("S3_STATE_KEY").unwrap_or_else(|| DEFAULT_S3_STATE_KEY.to_string());
        settings.state_file = s3_state_key.clone();

        Ok(Self {
            settings,
            s3_bucket: var("S3_BUCKET").ok_or_else(|| MonitorError::ConfigError {
                message: "S3_BUCKET environment variable is required".to_string(),
            })?,
            s3_state_key,
            s3_region: var("S3_REGION"),
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| MonitorError::InvalidConfigValueError {
                field: name.to_string(),
                value: raw.clone(),
                reason: "Could not parse value".to_string(),
            }),
        None => Ok(default),
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        self.settings.validate()?;
        validate_s3_bucket_name("s3_bucket", &self.s3_bucket)?;
        validation::validate_non_empty_string("s3_state_key", &self.s3_state_key)?;
        if let Some(region) = &self.s3_region {
            validate_aws_region("s3_region", region)?;
        }

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(MonitorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name must be between 3 and 63 characters".to_string(),
        });
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(MonitorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots"
                .to_string(),
        });
    }

    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(MonitorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name cannot start or end with a hyphen".to_string(),
        });
    }

    Ok(())
}

fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    validation::validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(MonitorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}

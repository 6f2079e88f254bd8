#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::adapters::http::{HttpFetcher, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::adapters::mail::{
    LogNotifier, SmtpNotifier, SmtpSettings, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT,
};
use crate::adapters::storage::LocalStorage;
use crate::core::state::{JsonStateStore, DEFAULT_STATE_FILE};
use crate::core::{ConfigProvider, Notifier};
use crate::utils::error::{MonitorError, Result};
use crate::utils::validation::{self, Validate};
use std::fmt;
use std::time::Duration;

/// CI 排程在 secret 未設定時會給空字串，當作沒有設定
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Fully resolved settings for one tick, whatever source they came from.
#[derive(Clone, PartialEq, Eq)]
pub struct MonitorSettings {
    pub url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub state_dir: String,
    pub state_file: String,
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    pub recipient_email: Option<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub notify_on_cold_start: bool,
    pub notify_on_unknown: bool,
    pub dry_run: bool,
}

impl MonitorSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            state_dir: ".".to_string(),
            state_file: DEFAULT_STATE_FILE.to_string(),
            sender_email: None,
            sender_password: None,
            recipient_email: None,
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            notify_on_cold_start: false,
            notify_on_unknown: false,
            dry_run: false,
        }
    }

    /// 三個郵件欄位都有值才回傳
    pub fn smtp_settings(&self) -> Option<SmtpSettings> {
        match (
            &self.sender_email,
            &self.sender_password,
            &self.recipient_email,
        ) {
            (Some(sender), Some(password), Some(_)) => Some(SmtpSettings {
                host: self.smtp_host.clone(),
                port: self.smtp_port,
                sender_email: sender.clone(),
                sender_password: password.clone(),
            }),
            _ => None,
        }
    }

    pub fn build_fetcher(&self) -> Result<HttpFetcher> {
        HttpFetcher::new(Duration::from_secs(self.timeout_secs), &self.user_agent)
    }

    pub fn build_notifier(&self) -> Result<Box<dyn Notifier>> {
        match self.smtp_settings() {
            Some(smtp) => {
                tracing::debug!("Using SMTP relay {}:{}", smtp.host, smtp.port);
                Ok(Box::new(SmtpNotifier::new(&smtp)?))
            }
            None => {
                tracing::warn!("📭 Email credentials not configured, alerts will only be logged");
                Ok(Box::new(LogNotifier))
            }
        }
    }

    pub fn build_state_store(&self) -> JsonStateStore<LocalStorage> {
        JsonStateStore::with_key(LocalStorage::new(&self.state_dir), &self.state_file)
    }

    pub fn mail_configured(&self) -> bool {
        self.smtp_settings().is_some()
    }
}

// 密碼不能出現在 log
impl fmt::Debug for MonitorSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorSettings")
            .field("url", &self.url)
            .field("timeout_secs", &self.timeout_secs)
            .field("state_dir", &self.state_dir)
            .field("state_file", &self.state_file)
            .field("sender_email", &self.sender_email)
            .field(
                "sender_password",
                &self.sender_password.as_ref().map(|_| "********"),
            )
            .field("recipient_email", &self.recipient_email)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("notify_on_cold_start", &self.notify_on_cold_start)
            .field("notify_on_unknown", &self.notify_on_unknown)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl ConfigProvider for MonitorSettings {
    fn target_url(&self) -> &str {
        &self.url
    }

    fn recipient(&self) -> Option<&str> {
        self.recipient_email.as_deref()
    }

    fn notify_on_cold_start(&self) -> bool {
        self.notify_on_cold_start
    }

    fn notify_on_unknown(&self) -> bool {
        self.notify_on_unknown
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}

impl Validate for MonitorSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("url", &self.url)?;
        validation::validate_range("timeout_secs", self.timeout_secs, 1, 300)?;
        validation::validate_non_empty_string("user_agent", &self.user_agent)?;
        validation::validate_path("state_dir", &self.state_dir)?;
        validation::validate_path("state_file", &self.state_file)?;
        validation::validate_non_empty_string("smtp_host", &self.smtp_host)?;
        validation::validate_range("smtp_port", self.smtp_port, 1, u16::MAX)?;

        let mail_fields = [
            ("sender_email", &self.sender_email),
            ("sender_password", &self.sender_password),
            ("recipient_email", &self.recipient_email),
        ];
        let configured = mail_fields.iter().filter(|(_, v)| v.is_some()).count();

        // 部分設定通常是漏了某個環境變數
        if configured > 0 && configured < mail_fields.len() {
            for (field, value) in mail_fields {
                validation::validate_required_field(field, value)?;
            }
        }

        if let Some(sender) = &self.sender_email {
            validation::validate_email("sender_email", sender)?;
        }
        if let Some(password) = &self.sender_password {
            if password.is_empty() {
                return Err(MonitorError::InvalidConfigValueError {
                    field: "sender_password".to_string(),
                    value: String::new(),
                    reason: "Password cannot be empty".to_string(),
                });
            }
        }
        if let Some(recipient) = &self.recipient_email {
            validation::validate_email("recipient_email", recipient)?;
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}

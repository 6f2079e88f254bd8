use crate::config::toml_config::TomlConfig;
use crate::config::{non_blank, MonitorSettings};
use crate::utils::error::{MonitorError, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "stock-watch")]
#[command(about = "Check a product page once and e-mail when its stock status changes")]
pub struct CliConfig {
    /// Product page to monitor
    #[arg(long, env = "MONITOR_URL")]
    pub url: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding the persisted status file
    #[arg(long, env = "STATE_DIR")]
    pub state_dir: Option<String>,

    #[arg(long)]
    pub state_file: Option<String>,

    #[arg(long, env = "SENDER_EMAIL")]
    pub sender_email: Option<String>,

    #[arg(long, env = "SENDER_PASSWORD", hide_env_values = true)]
    pub sender_password: Option<String>,

    #[arg(long, env = "RECIPIENT_EMAIL")]
    pub recipient_email: Option<String>,

    #[arg(long, env = "SMTP_HOST")]
    pub smtp_host: Option<String>,

    #[arg(long, env = "SMTP_PORT")]
    pub smtp_port: Option<u16>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Send an alert on the very first observation as well
    #[arg(long)]
    pub notify_on_cold_start: bool,

    /// Send an alert when the status becomes unknown
    #[arg(long)]
    pub notify_on_unknown: bool,

    /// Fetch and classify only; no e-mail, no state write
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 優先順序：命令列/環境變數 > TOML 檔 > 預設值
    pub fn resolve(&self) -> Result<MonitorSettings> {
        let file = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        let url = self
            .url
            .clone()
            .or_else(|| file.target.url.clone())
            .ok_or_else(|| MonitorError::MissingConfigError {
                field: "url (MONITOR_URL)".to_string(),
            })?;

        let mut settings = MonitorSettings::new(url.clone());
        file.apply_to(&mut settings);
        settings.url = url;

        if let Some(dir) = &self.state_dir {
            settings.state_dir = dir.clone();
        }
        if let Some(file) = &self.state_file {
            settings.state_file = file.clone();
        }
        if let Some(sender) = non_blank(self.sender_email.clone()) {
            settings.sender_email = Some(sender);
        }
        if let Some(password) = non_blank(self.sender_password.clone()) {
            settings.sender_password = Some(password);
        }
        if let Some(recipient) = non_blank(self.recipient_email.clone()) {
            settings.recipient_email = Some(recipient);
        }
        if let Some(host) = &self.smtp_host {
            settings.smtp_host = host.clone();
        }
        if let Some(port) = self.smtp_port {
            settings.smtp_port = port;
        }
        if let Some(timeout) = self.timeout_secs {
            settings.timeout_secs = timeout;
        }

        settings.notify_on_cold_start |= self.notify_on_cold_start;
        settings.notify_on_unknown |= self.notify_on_unknown;
        settings.dry_run = self.dry_run;

        Ok(settings)
    }
}

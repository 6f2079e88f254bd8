use crate::config::{non_blank, MonitorSettings};
use crate::utils::error::{MonitorError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailConfig {
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    pub recipient_email: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateConfig {
    pub dir: Option<String>,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BehaviorConfig {
    pub notify_on_cold_start: Option<bool>,
    pub notify_on_unknown: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MonitorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MonitorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SENDER_PASSWORD})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MonitorError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Fill every setting the file provides into `settings`.
    pub fn apply_to(&self, settings: &mut MonitorSettings) {
        if let Some(url) = &self.target.url {
            settings.url = url.clone();
        }
        if let Some(timeout) = self.target.timeout_secs {
            settings.timeout_secs = timeout;
        }
        if let Some(user_agent) = &self.target.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(sender) = non_blank(self.mail.sender_email.clone()) {
            settings.sender_email = Some(sender);
        }
        if let Some(password) = non_blank(self.mail.sender_password.clone()) {
            settings.sender_password = Some(password);
        }
        if let Some(recipient) = non_blank(self.mail.recipient_email.clone()) {
            settings.recipient_email = Some(recipient);
        }
        if let Some(host) = &self.mail.smtp_host {
            settings.smtp_host = host.clone();
        }
        if let Some(port) = self.mail.smtp_port {
            settings.smtp_port = port;
        }
        if let Some(dir) = &self.state.dir {
            settings.state_dir = dir.clone();
        }
        if let Some(file) = &self.state.file {
            settings.state_file = file.clone();
        }
        if let Some(flag) = self.behavior.notify_on_cold_start {
            settings.notify_on_cold_start = flag;
        }
        if let Some(flag) = self.behavior.notify_on_unknown {
            settings.notify_on_unknown = flag;
        }
    }
}

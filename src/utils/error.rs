use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Page request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("State object not found: {path}")]
    StateNotFound { path: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Notification error: {message}")]
    NotificationError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Notification,
    Configuration,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MonitorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MonitorError::ApiError(_) | MonitorError::HttpStatus { .. } => ErrorCategory::Network,
            MonitorError::IoError(_)
            | MonitorError::StateNotFound { .. }
            | MonitorError::StorageError { .. } => ErrorCategory::Storage,
            MonitorError::SerializationError(_) => ErrorCategory::Data,
            MonitorError::NotificationError { .. } => ErrorCategory::Notification,
            MonitorError::ConfigError { .. }
            | MonitorError::MissingConfigError { .. }
            | MonitorError::InvalidConfigValueError { .. }
            | MonitorError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 下一次排程會自動重試
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Notification => ErrorSeverity::Low,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 對應排程器看到的退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            MonitorError::StateNotFound { .. } => true,
            MonitorError::IoError(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MonitorError::ApiError(_) => {
                "Check network connectivity; the next scheduled tick will retry"
            }
            MonitorError::HttpStatus { .. } => {
                "The product page rejected the request; verify MONITOR_URL and wait for the next tick"
            }
            MonitorError::IoError(_) | MonitorError::StorageError { .. } => {
                "Check that the state directory or bucket exists and is writable"
            }
            MonitorError::StateNotFound { .. } => {
                "No previous state was stored; this is expected on the first run"
            }
            MonitorError::SerializationError(_) => {
                "Delete the corrupt state file; the next tick starts from a clean baseline"
            }
            MonitorError::NotificationError { .. } => {
                "Verify SENDER_EMAIL, SENDER_PASSWORD and the SMTP host settings"
            }
            MonitorError::ConfigError { .. }
            | MonitorError::MissingConfigError { .. }
            | MonitorError::InvalidConfigValueError { .. }
            | MonitorError::ConfigValidationError { .. } => {
                "Review the command line flags, environment variables and config file"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MonitorError::ApiError(_) | MonitorError::HttpStatus { .. } => {
                format!("Could not fetch the product page: {}", self)
            }
            MonitorError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            MonitorError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            MonitorError::NotificationError { message } => {
                format!("Could not send the stock alert: {}", message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;

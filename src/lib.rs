pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "lambda")]
pub use adapters::S3Storage;
#[cfg(feature = "lambda")]
pub use config::lambda::LambdaConfig;

pub use adapters::{HttpFetcher, LocalStorage, LogNotifier, SmtpNotifier};
pub use config::MonitorSettings;
pub use core::{engine::MonitorEngine, state::JsonStateStore};
pub use domain::model::{NotificationOutcome, PersistedStatus, StockStatus, TickOutcome};
pub use utils::error::{MonitorError, Result};

pub mod checker;
pub mod classifier;
pub mod engine;
pub mod state;

pub use crate::domain::model::{
    NotificationEvent, NotificationOutcome, Observation, PersistedStatus, StockStatus,
    TickOutcome,
};
pub use crate::domain::ports::{ConfigProvider, Notifier, PageFetcher, StateStore, Storage};
pub use crate::utils::error::Result;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 商品頁面的庫存分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    InStock,
    OutOfStock,
    Unknown,
}

impl StockStatus {
    pub fn is_known(&self) -> bool {
        !matches!(self, StockStatus::Unknown)
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StockStatus::InStock => "in-stock",
            StockStatus::OutOfStock => "out-of-stock",
            StockStatus::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// The single durable snapshot exchanged between ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedStatus {
    pub status: StockStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_signal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl PersistedStatus {
    pub fn new(status: StockStatus, timestamp: DateTime<Utc>) -> Self {
        Self {
            status,
            timestamp,
            raw_signal: None,
            url: None,
        }
    }

    /// 舊版本寫入的紀錄沒有 url，視為同一個目標
    pub fn tracks(&self, url: &str) -> bool {
        self.url.as_deref().map_or(true, |tracked| tracked == url)
    }
}

/// What the classifier saw on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub status: StockStatus,
    pub raw_signal: String,
    pub out_of_stock_phrase: Option<&'static str>,
    pub in_stock_phrase: Option<&'static str>,
    pub enabled_purchase_controls: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub previous: Option<StockStatus>,
    pub current: StockStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    NotRequired,
    Sent,
    Failed(String),
    /// dry run 時不寄信
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub previous: Option<PersistedStatus>,
    pub current: PersistedStatus,
    pub notification: NotificationOutcome,
    pub persisted: bool,
}

impl TickOutcome {
    pub fn changed(&self) -> bool {
        self.previous
            .as_ref()
            .map_or(true, |prior| prior.status != self.current.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_uses_screaming_snake_case_labels() {
        assert_eq!(
            serde_json::to_string(&StockStatus::OutOfStock).unwrap(),
            "\"OUT_OF_STOCK\""
        );
        let parsed: StockStatus = serde_json::from_str("\"IN_STOCK\"").unwrap();
        assert_eq!(parsed, StockStatus::InStock);
    }

    #[test]
    fn test_persisted_status_round_trip() {
        let record = PersistedStatus {
            status: StockStatus::InStock,
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, 15, 0).unwrap(),
            raw_signal: Some("abc123".to_string()),
            url: Some("https://shop.example.com/item".to_string()),
        };

        let json = serde_json::to_string_pretty(&record).unwrap();
        let back: PersistedStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_minimal_record_loads_with_defaults() {
        let json = r#"{"status":"OUT_OF_STOCK","timestamp":"2026-03-01T12:00:00Z","extra":1}"#;
        let record: PersistedStatus = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, StockStatus::OutOfStock);
        assert!(record.raw_signal.is_none());
        assert!(record.tracks("https://anything.example.com"));
    }

    #[test]
    fn test_tracks_compares_url() {
        let mut record = PersistedStatus::new(StockStatus::InStock, Utc::now());
        record.url = Some("https://a.example.com".to_string());
        assert!(record.tracks("https://a.example.com"));
        assert!(!record.tracks("https://b.example.com"));
    }
}

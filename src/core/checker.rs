use crate::domain::model::{NotificationEvent, Observation, PersistedStatus, StockStatus};
use chrono::{DateTime, Utc};

/// When a change is worth an e-mail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyPolicy {
    /// 第一次觀察（沒有前次狀態）時也寄信
    pub notify_on_cold_start: bool,
    /// 變成 Unknown 時也寄信
    pub notify_on_unknown: bool,
}

impl NotifyPolicy {
    fn is_notify_worthy(&self, status: StockStatus) -> bool {
        status.is_known() || self.notify_on_unknown
    }
}

#[derive(Debug, Clone)]
pub struct CheckContext<'a> {
    pub url: &'a str,
    pub recipient: &'a str,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub next_state: PersistedStatus,
    pub notification: Option<NotificationEvent>,
    pub cold_start: bool,
}

/// Compare the prior snapshot with a fresh observation.
///
/// The next state is always the observation. A prior record written for a
/// different URL is treated the same as no record at all.
pub fn evaluate(
    prior: Option<&PersistedStatus>,
    observation: &Observation,
    policy: NotifyPolicy,
    ctx: &CheckContext<'_>,
) -> Decision {
    let baseline = prior.filter(|record| record.tracks(ctx.url));
    let current = observation.status;

    let should_notify = match baseline {
        None => policy.notify_on_cold_start && policy.is_notify_worthy(current),
        Some(record) => record.status != current && policy.is_notify_worthy(current),
    };

    let previous_status = baseline.map(|record| record.status);
    let notification =
        should_notify.then(|| build_notification(previous_status, current, ctx));

    let next_state = PersistedStatus {
        status: current,
        timestamp: ctx.checked_at,
        raw_signal: Some(observation.raw_signal.clone()),
        url: Some(ctx.url.to_string()),
    };

    Decision {
        next_state,
        notification,
        cold_start: baseline.is_none(),
    }
}

pub fn build_notification(
    previous: Option<StockStatus>,
    current: StockStatus,
    ctx: &CheckContext<'_>,
) -> NotificationEvent {
    let check_time = ctx.checked_at.format("%Y-%m-%d %H:%M:%S UTC");
    let previous_label = previous.map_or_else(|| "not checked before".to_string(), |s| s.to_string());

    let (subject, headline) = match current {
        StockStatus::InStock => (
            "STOCK ALERT - Item Available!",
            "Great news! The item you're monitoring appears to be back in stock!",
        ),
        StockStatus::OutOfStock => (
            "Stock update - Item sold out",
            "The item you're monitoring now appears to be out of stock.",
        ),
        StockStatus::Unknown => (
            "Stock update - Status unknown",
            "The stock status of the item you're monitoring could not be determined.",
        ),
    };

    let mut body = format!(
        "{}\n\nURL: {}\nPrevious status: {}\nCurrent status: {}\nCheck time: {}\n",
        headline, ctx.url, previous_label, current, check_time
    );
    if current == StockStatus::InStock {
        body.push_str("\nGo grab it now!\n");
    }
    body.push_str("\nThis alert was sent by your scheduled stock monitor.\n");

    NotificationEvent {
        recipient: ctx.recipient.to_string(),
        subject: subject.to_string(),
        body,
        previous,
        current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const URL: &str = "https://shop.example.com/widget";

    fn ctx() -> CheckContext<'static> {
        CheckContext {
            url: URL,
            recipient: "me@example.com",
            checked_at: Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap(),
        }
    }

    fn observed(status: StockStatus) -> Observation {
        Observation {
            status,
            raw_signal: format!("signal-{}", status),
            out_of_stock_phrase: None,
            in_stock_phrase: None,
            enabled_purchase_controls: 0,
        }
    }

    fn prior(status: StockStatus) -> PersistedStatus {
        PersistedStatus {
            status,
            timestamp: Utc.with_ymd_and_hms(2026, 5, 4, 9, 15, 0).unwrap(),
            raw_signal: None,
            url: Some(URL.to_string()),
        }
    }

    const ALL: [StockStatus; 3] = [
        StockStatus::InStock,
        StockStatus::OutOfStock,
        StockStatus::Unknown,
    ];

    #[test]
    fn test_same_status_never_notifies() {
        for status in ALL {
            for policy in [
                NotifyPolicy::default(),
                NotifyPolicy {
                    notify_on_cold_start: true,
                    notify_on_unknown: true,
                },
            ] {
                let decision = evaluate(Some(&prior(status)), &observed(status), policy, &ctx());
                assert!(decision.notification.is_none(), "{status} -> {status}");
                assert_eq!(decision.next_state.status, status);
            }
        }
    }

    #[test]
    fn test_known_change_notifies_exactly_once() {
        for (from, to) in [
            (StockStatus::OutOfStock, StockStatus::InStock),
            (StockStatus::InStock, StockStatus::OutOfStock),
        ] {
            let decision = evaluate(
                Some(&prior(from)),
                &observed(to),
                NotifyPolicy::default(),
                &ctx(),
            );
            let event = decision.notification.expect("change should notify");
            assert_eq!(event.previous, Some(from));
            assert_eq!(event.current, to);
            assert_eq!(decision.next_state.status, to);
            assert!(!decision.cold_start);
        }
    }

    #[test]
    fn test_back_in_stock_message() {
        let decision = evaluate(
            Some(&prior(StockStatus::OutOfStock)),
            &observed(StockStatus::InStock),
            NotifyPolicy::default(),
            &ctx(),
        );
        let event = decision.notification.unwrap();
        assert_eq!(event.recipient, "me@example.com");
        assert_eq!(event.subject, "STOCK ALERT - Item Available!");
        assert!(event.body.contains(URL));
        assert!(event.body.contains("Previous status: out-of-stock"));
        assert!(event.body.contains("2026-05-04 09:30:00 UTC"));
        assert_eq!(decision.next_state.url.as_deref(), Some(URL));
        assert_eq!(
            decision.next_state.raw_signal.as_deref(),
            Some("signal-in-stock")
        );
    }

    #[test]
    fn test_cold_start_is_silent_by_default() {
        for status in ALL {
            let decision = evaluate(None, &observed(status), NotifyPolicy::default(), &ctx());
            assert!(decision.notification.is_none());
            assert!(decision.cold_start);
            assert_eq!(decision.next_state.status, status);
        }
    }

    #[test]
    fn test_cold_start_notifies_known_status_when_enabled() {
        let policy = NotifyPolicy {
            notify_on_cold_start: true,
            notify_on_unknown: false,
        };
        let decision = evaluate(None, &observed(StockStatus::InStock), policy, &ctx());
        let event = decision.notification.unwrap();
        assert_eq!(event.previous, None);
        assert!(event.body.contains("not checked before"));

        let unknown = evaluate(None, &observed(StockStatus::Unknown), policy, &ctx());
        assert!(unknown.notification.is_none());
    }

    #[test]
    fn test_drop_to_unknown_is_silent_unless_enabled() {
        let from = prior(StockStatus::InStock);
        let silent = evaluate(
            Some(&from),
            &observed(StockStatus::Unknown),
            NotifyPolicy::default(),
            &ctx(),
        );
        assert!(silent.notification.is_none());
        assert_eq!(silent.next_state.status, StockStatus::Unknown);

        let loud = evaluate(
            Some(&from),
            &observed(StockStatus::Unknown),
            NotifyPolicy {
                notify_on_cold_start: false,
                notify_on_unknown: true,
            },
            &ctx(),
        );
        assert_eq!(
            loud.notification.unwrap().subject,
            "Stock update - Status unknown"
        );
    }

    #[test]
    fn test_unknown_to_in_stock_notifies() {
        let decision = evaluate(
            Some(&prior(StockStatus::Unknown)),
            &observed(StockStatus::InStock),
            NotifyPolicy::default(),
            &ctx(),
        );
        assert!(decision.notification.is_some());
    }

    #[test]
    fn test_prior_for_other_url_is_cold_start() {
        let mut other = prior(StockStatus::OutOfStock);
        other.url = Some("https://shop.example.com/other".to_string());

        let decision = evaluate(
            Some(&other),
            &observed(StockStatus::InStock),
            NotifyPolicy::default(),
            &ctx(),
        );
        assert!(decision.cold_start);
        assert!(decision.notification.is_none());
        assert_eq!(decision.next_state.url.as_deref(), Some(URL));
    }
}

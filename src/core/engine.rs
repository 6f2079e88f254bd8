use crate::core::checker::{self, CheckContext, NotifyPolicy};
use crate::core::classifier;
use crate::core::{
    ConfigProvider, NotificationOutcome, Notifier, PageFetcher, StateStore, TickOutcome,
};
use crate::utils::error::Result;
use chrono::Utc;

/// Runs one tick: load state, fetch, compare, notify, persist.
pub struct MonitorEngine<St: StateStore, F: PageFetcher, N: Notifier, C: ConfigProvider> {
    state: St,
    fetcher: F,
    notifier: N,
    config: C,
}

impl<St, F, N, C> MonitorEngine<St, F, N, C>
where
    St: StateStore,
    F: PageFetcher,
    N: Notifier,
    C: ConfigProvider,
{
    pub fn new(state: St, fetcher: F, notifier: N, config: C) -> Self {
        Self {
            state,
            fetcher,
            notifier,
            config,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn state_store(&self) -> &St {
        &self.state
    }

    pub async fn run_tick(&self) -> Result<TickOutcome> {
        let url = self.config.target_url();
        let checked_at = Utc::now();
        tracing::info!("🔍 Checking stock status for: {}", url);
        tracing::info!("⏰ Check time: {}", checked_at.format("%Y-%m-%d %H:%M:%S UTC"));

        let previous = self.state.load_state().await;

        // 抓取失敗時直接結束，狀態檔維持原樣讓下一次排程重試
        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::error!("❌ Error fetching webpage: {}", e);
                return Err(e);
            }
        };
        tracing::debug!("Fetched {} bytes of HTML", html.len());

        let observation = classifier::classify(&html);
        match observation.status {
            crate::core::StockStatus::InStock => tracing::info!("🎉 Item appears to be in stock"),
            crate::core::StockStatus::OutOfStock => tracing::info!("📦 Item is out of stock"),
            crate::core::StockStatus::Unknown => {
                tracing::info!("❓ Could not determine stock status")
            }
        }

        let policy = NotifyPolicy {
            notify_on_cold_start: self.config.notify_on_cold_start(),
            notify_on_unknown: self.config.notify_on_unknown(),
        };
        let ctx = CheckContext {
            url,
            recipient: self.config.recipient().unwrap_or_default(),
            checked_at,
        };
        let decision = checker::evaluate(previous.as_ref(), &observation, policy, &ctx);

        if decision.cold_start {
            tracing::info!("Recording {} as the first baseline", decision.next_state.status);
        }

        let dry_run = self.config.dry_run();
        let notification = match decision.notification {
            None => NotificationOutcome::NotRequired,
            Some(event) if dry_run => {
                tracing::info!("🔕 Dry run, not sending: {}", event.subject);
                NotificationOutcome::Skipped
            }
            Some(event) => match self.notifier.send(&event).await {
                Ok(()) => {
                    tracing::info!("✅ Notification sent to {}", event.recipient);
                    NotificationOutcome::Sent
                }
                Err(e) => {
                    // 仍然寫入新狀態，避免每次排程都重複通知同一個變化
                    tracing::error!("❌ Failed to send notification: {}", e);
                    tracing::error!("💡 {}", e.recovery_suggestion());
                    NotificationOutcome::Failed(e.to_string())
                }
            },
        };

        let persisted = if dry_run {
            tracing::info!("🔍 Dry run, leaving state untouched");
            false
        } else {
            self.state.save_state(&decision.next_state).await?;
            tracing::debug!("State saved: {}", decision.next_state.status);
            true
        };

        Ok(TickOutcome {
            previous,
            current: decision.next_state,
            notification,
            persisted,
        })
    }
}

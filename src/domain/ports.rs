use crate::domain::model::{NotificationEvent, PersistedStatus};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Durable blob storage provided by the hosting platform.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 上一次觀察結果的讀寫介面；讀取失敗一律視為冷啟動
pub trait StateStore: Send + Sync {
    fn load_state(&self) -> impl std::future::Future<Output = Option<PersistedStatus>> + Send;
    fn save_state(
        &self,
        state: &PersistedStatus,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the response body of a successful (2xx) request.
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, event: &NotificationEvent) -> Result<()>;
}

#[async_trait]
impl<N: Notifier + ?Sized> Notifier for Box<N> {
    async fn send(&self, event: &NotificationEvent) -> Result<()> {
        (**self).send(event).await
    }
}

pub trait ConfigProvider: Send + Sync {
    fn target_url(&self) -> &str;
    fn recipient(&self) -> Option<&str>;
    fn notify_on_cold_start(&self) -> bool;
    fn notify_on_unknown(&self) -> bool;
    fn dry_run(&self) -> bool;
}

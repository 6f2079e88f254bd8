// Adapters layer: concrete implementations of the domain ports (storage, http, mail).

pub mod http;
pub mod mail;
pub mod storage;

pub use http::HttpFetcher;
pub use mail::{LogNotifier, SmtpNotifier, SmtpSettings};
pub use storage::LocalStorage;

#[cfg(feature = "lambda")]
pub use storage::S3Storage;

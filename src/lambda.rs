#[cfg(feature = "lambda")]
use aws_config::BehaviorVersion;
#[cfg(feature = "lambda")]
use aws_sdk_s3::config::Region;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "lambda")]
use stock_watch::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use stock_watch::{
    JsonStateStore, LambdaConfig, MonitorEngine, NotificationOutcome, S3Storage,
};

/// Scheduled events carry no useful payload; everything else is ignored.
#[cfg(feature = "lambda")]
#[derive(Deserialize)]
pub struct Request {
    pub url: Option<String>,
}

#[cfg(feature = "lambda")]
#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub status: String,
    pub previous_status: Option<String>,
    pub notification: String,
    pub persisted: bool,
}

#[cfg(feature = "lambda")]
async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    tracing::info!("Starting stock-watch Lambda tick");

    let mut lambda_config = LambdaConfig::from_env()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    // 事件裡有 url 時覆蓋環境變數
    if let Some(url) = event.payload.url {
        lambda_config.settings.url = url;
    }

    lambda_config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let mut builder = aws_sdk_s3::config::Builder::from(&config).force_path_style(true);
    // 沒有指定時用 AWS_REGION（load_defaults 已讀入）
    if let Some(region) = lambda_config.s3_region.clone() {
        builder = builder.region(Region::new(region));
    }
    let s3_client = S3Client::from_conf(builder.build());

    let storage = S3Storage::new(s3_client, lambda_config.s3_bucket.clone());
    let state = JsonStateStore::with_key(storage, lambda_config.s3_state_key.clone());
    let settings = lambda_config.settings;
    let fetcher = settings
        .build_fetcher()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    let notifier = settings
        .build_notifier()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let engine = MonitorEngine::new(state, fetcher, notifier, settings);
    // 抓取失敗時回傳錯誤，讓這次排程呼叫被標記為失敗
    let outcome = engine
        .run_tick()
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let notification = match &outcome.notification {
        NotificationOutcome::NotRequired => "not_required".to_string(),
        NotificationOutcome::Sent => "sent".to_string(),
        NotificationOutcome::Skipped => "skipped".to_string(),
        NotificationOutcome::Failed(reason) => format!("failed: {}", reason),
    };

    let response = Response {
        message: "Stock check completed".to_string(),
        status: outcome.current.status.to_string(),
        previous_status: outcome.previous.map(|p| p.status.to_string()),
        notification,
        persisted: outcome.persisted,
    };

    tracing::info!("stock-watch Lambda tick completed successfully");
    Ok(response)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}

use clap::Parser;
use stock_watch::utils::{logger, validation::Validate};
use stock_watch::{CliConfig, MonitorEngine, MonitorError, NotificationOutcome};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting stock-watch");

    if let Err(e) = run(config).await {
        tracing::error!(
            "❌ Stock check failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(config: CliConfig) -> Result<(), MonitorError> {
    let settings = config.resolve()?;
    tracing::debug!("Resolved settings: {:?}", settings);

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return Err(e);
    }

    let state = settings.build_state_store();
    let fetcher = settings.build_fetcher()?;
    let notifier = settings.build_notifier()?;
    let engine = MonitorEngine::new(state, fetcher, notifier, settings);

    let outcome = engine.run_tick().await?;

    let previous = outcome
        .previous
        .as_ref()
        .map_or_else(|| "none".to_string(), |p| p.status.to_string());
    println!(
        "Status: {} (previous: {})",
        outcome.current.status, previous
    );

    match &outcome.notification {
        NotificationOutcome::Sent => println!("📧 Notification sent"),
        NotificationOutcome::Failed(reason) => println!("⚠️ Notification failed: {}", reason),
        NotificationOutcome::Skipped => println!("🔕 Notification skipped (dry run)"),
        NotificationOutcome::NotRequired => {}
    }

    if outcome.persisted {
        tracing::info!(
            "📁 State saved to: {}",
            engine.state_store().storage().base_path().join(engine.state_store().key()).display()
        );
    }

    Ok(())
}

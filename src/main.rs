mod config;
mod detection;
mod execution;
mod models;
mod polymarket;
mod services;

use std::sync::Arc;

use tokio::sync::watch;

use crate::config::AppConfig;
use crate::detection::{run_poller, PollerConfig, SignalPipeline};
use crate::execution::{ExecutionSink, NoopExecutor};
use crate::polymarket::{DataClient, GammaClient};
use crate::services::{LogNotifier, NotificationSink, TelegramNotifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    tracing::info!(
        min_trade_amount = %config.min_trade_amount,
        lookback_hours = config.lookback_hours,
        "Starting Polymarket copy-trade signal bot"
    );

    let http = reqwest::Client::new();

    let source = match &config.data_api_url {
        Some(url) => DataClient::with_base_url(http.clone(), url.clone()),
        None => DataClient::new(http.clone()),
    };
    let metadata = match &config.gamma_api_url {
        Some(url) => GammaClient::with_base_url(http.clone(), url.clone()),
        None => GammaClient::new(http.clone()),
    };

    let mut notifiers: Vec<Arc<dyn NotificationSink>> = vec![Arc::new(LogNotifier)];
    if config.has_telegram() {
        notifiers.push(Arc::new(TelegramNotifier::new(
            config.telegram_bot_token.clone().unwrap(),
            config.telegram_chat_id.clone().unwrap(),
        )));
        tracing::info!("Telegram notifications enabled");
    }

    // The default executor never places orders; running without credentials
    // is always pure monitoring, even with EXECUTION_ENABLED set.
    let executor: Arc<dyn ExecutionSink> = Arc::new(NoopExecutor);
    if config.execution_enabled {
        tracing::warn!("Execution enabled — orders dispatch to the dry-run executor");
    }

    let pipeline = SignalPipeline::new(
        source,
        metadata,
        notifiers,
        executor,
        PollerConfig {
            poll_interval: config.poll_interval(),
            max_backoff: config.max_backoff(),
            fetch_limit: config.fetch_limit,
            min_trade_amount: config.min_trade_amount,
            lookback: config.lookback(),
            execution_enabled: config.execution_enabled,
        },
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = tokio::spawn(run_poller(pipeline, shutdown_rx));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping after current cycle");
    let _ = shutdown_tx.send(true);

    poller.await?;
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();
}

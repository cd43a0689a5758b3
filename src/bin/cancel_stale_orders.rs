//! Cancels pending orders that were never confirmed and returns their stock.
//! Meant to be run on a fixed interval by cron or a similar scheduler.

use std::sync::Arc;

use dancy_meals::{
    config::AppConfig,
    db::{create_pool, orm_from_pool},
    services::order_service::cancel_stale_orders,
    state::AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,dancy_meals=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    let older_than = chrono::Duration::minutes(config.order_stale_after_minutes);
    let state = AppState {
        orm: orm_from_pool(&pool),
        pool,
        config: Arc::new(config),
    };

    let cancelled = cancel_stale_orders(&state, older_than).await?;
    tracing::info!(cancelled, "stale order sweep finished");
    Ok(())
}

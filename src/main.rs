use marble_maze::config::{Environment, Settings};
use marble_maze::server;
use marble_maze::store::LeaderboardStore;

use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = Settings::new()?;

    // RUST_LOG, when set, refines the configured trace level.
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(settings.trace_level()).into())
        .from_env_lossy();
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(
        "Starting in {} mode, leaderboard capacity {} ({} eviction)",
        settings.env, settings.capacity, settings.eviction_scope
    );

    // A corrupt backing file stops the process here rather than being overwritten.
    let store = LeaderboardStore::from_settings(&settings);
    store.initialize()?;

    // Administrative reset over HTTP only outside production.
    let allow_reset = settings.env == Environment::Development;
    server::serve(store, &settings.bind_address(), allow_reset).await?;

    Ok(())
}

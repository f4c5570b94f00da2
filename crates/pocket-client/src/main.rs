use tracing::info;

use pocket_client::config::ClientConfig;
use pocket_client::{build_state, cli, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    info!("Starting Pocket Coach v{}", env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::from_env();
    info!(?config, "Loaded configuration");

    let mut state = build_state(&config).await?;
    state.load().await;

    cli::run(&mut state).await
}

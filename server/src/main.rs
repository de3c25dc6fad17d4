use milksync_server::{Config, Server, ServerState, init_logger, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading any configuration
    dotenv::dotenv().ok();

    let config = Config::from_env();
    init_logger(&config);

    print_banner();
    tracing::info!("MilkSync server starting...");

    let state = ServerState::initialize(&config).await?;
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

use catalog_server::{Config, Server, ServerState, init_logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logger();

    tracing::info!("Catalog server starting...");

    let config = Config::from_env();
    let state = ServerState::initialize(&config).await?;

    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

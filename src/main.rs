use std::sync::Arc;
use tracing::info;

use chat_relay::config::ServerConfig;
use chat_relay::handlers::AppState;
use chat_relay::llm::create_client;
use chat_relay::routes::configure_routes;
use chat_relay::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    telemetry::init_server_logging();

    let config = ServerConfig::from_env()?;
    let client = create_client(&config.provider).await?;
    let state = Arc::new(AppState::new(Arc::from(client), config.chat.clone()));
    let routes = configure_routes(state, config.static_file.clone());

    let (addr, server) = warp::serve(routes).try_bind_with_graceful_shutdown(
        config.socket_addr(),
        async {
            tokio::signal::ctrl_c().await.ok();
        },
    )?;

    info!("Chatbot server running at http://{}", addr);
    info!("Serving static file: {}", config.static_file.display());
    info!(
        model = %config.chat.model,
        max_message_chars = ?config.chat.max_message_chars,
        on_stream_error = ?config.chat.on_stream_error,
        "Using model"
    );

    server.await;
    info!("Server stopped");
    Ok(())
}

use std::sync::Arc;

use chat_relay::config::ChatSettings;
use chat_relay::handlers::AppState;
use chat_relay::llm::{GenerationClient, ScriptedClient};

/// The page served at `/`
pub const INDEX_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/public/index.html");

/// Build shared state around a scripted client, keeping a handle for assertions
pub fn scripted_state(
    client: ScriptedClient,
    chat: ChatSettings,
) -> (Arc<AppState>, Arc<ScriptedClient>) {
    let client = Arc::new(client);
    let shared: Arc<dyn GenerationClient> = client.clone();
    (Arc::new(AppState::new(shared, chat)), client)
}

/// A JSON body of the form `{"message": ...}`
pub fn message_body(message: &str) -> String {
    serde_json::json!({ "message": message }).to_string()
}

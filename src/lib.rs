// HTTP server modules
pub mod handlers;
pub mod models;
pub mod routes;

// Relay core shared by the server and the CLI
pub mod relay;

// LLM abstraction layer
pub mod llm;

pub mod config;
pub mod prompts;
pub mod telemetry;

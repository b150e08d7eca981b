//! Environment-driven configuration for both binaries

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

use crate::llm::core::types::DEFAULT_MODEL;
use crate::llm::gemini::{ProviderSettings, GENERATIVE_LANGUAGE_BASE_URL};
use crate::prompts::CHATBOT_SYSTEM_PROMPT;
use crate::relay::stream::OnStreamError;
use crate::relay::validate::MAX_MESSAGE_CHARS;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_FILE: &str = "public/index.html";
pub const DEFAULT_GCP_LOCATION: &str = "us-central1";
/// Largest `/chat` request body accepted, well above a capped message
pub const DEFAULT_MAX_BODY_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is required{hint}")]
    Missing { var: &'static str, hint: &'static str },

    #[error("Invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// How `/chat` requests are turned into generation calls
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub system: String,
    pub model: String,
    /// `None` disables the length cap
    pub max_message_chars: Option<usize>,
    pub on_stream_error: OnStreamError,
    pub max_body_bytes: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            system: CHATBOT_SYSTEM_PROMPT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_message_chars: Some(MAX_MESSAGE_CHARS),
            on_stream_error: OnStreamError::Mark,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ChatSettings {
    /// No length cap, silent truncation on stream failure
    pub fn minimal() -> Self {
        Self {
            max_message_chars: None,
            on_stream_error: OnStreamError::Truncate,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub static_file: PathBuf,
    pub chat: ChatSettings,
    pub provider: ProviderSettings,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = match non_empty(&lookup, "HOST") {
            Some(value) => value
                .parse::<IpAddr>()
                .map_err(|e| invalid("HOST", &value, e.to_string()))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match non_empty(&lookup, "PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|e| invalid("PORT", &value, e.to_string()))?,
            None => DEFAULT_PORT,
        };

        let static_file = non_empty(&lookup, "STATIC_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_FILE));

        let mut chat = ChatSettings::default();
        if let Some(model) = non_empty(&lookup, "GEMINI_MODEL") {
            chat.model = model;
        }
        if let Some(value) = non_empty(&lookup, "MAX_MESSAGE_CHARS") {
            let max = value
                .parse::<usize>()
                .map_err(|e| invalid("MAX_MESSAGE_CHARS", &value, e.to_string()))?;
            chat.max_message_chars = (max > 0).then_some(max);
        }
        if let Some(value) = non_empty(&lookup, "MAX_BODY_BYTES") {
            chat.max_body_bytes = value
                .parse::<u64>()
                .map_err(|e| invalid("MAX_BODY_BYTES", &value, e.to_string()))?;
        }
        if let Some(value) = non_empty(&lookup, "ON_STREAM_ERROR") {
            chat.on_stream_error = value
                .parse()
                .map_err(|reason| invalid("ON_STREAM_ERROR", &value, reason))?;
        }

        Ok(Self {
            host,
            port,
            static_file,
            chat,
            provider: provider_from_lookup(&lookup)?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Read Gemini backend settings from the environment
pub fn provider_from_env() -> Result<ProviderSettings, ConfigError> {
    provider_from_lookup(|key| std::env::var(key).ok())
}

pub fn provider_from_lookup<F>(lookup: F) -> Result<ProviderSettings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let backend = non_empty(&lookup, "GEMINI_BACKEND")
        .unwrap_or_else(|| "generative-language".to_string())
        .to_ascii_lowercase();

    match backend.as_str() {
        "generative-language" | "api-key" => {
            let api_key = non_empty(&lookup, "GOOGLE_GENERATIVE_AI_API_KEY")
                .or_else(|| non_empty(&lookup, "GEMINI_API_KEY"))
                .ok_or(ConfigError::Missing {
                    var: "GOOGLE_GENERATIVE_AI_API_KEY",
                    hint: " (or GEMINI_API_KEY)",
                })?;
            let base_url = non_empty(&lookup, "GEMINI_BASE_URL")
                .unwrap_or_else(|| GENERATIVE_LANGUAGE_BASE_URL.to_string());
            Ok(ProviderSettings::GenerativeLanguage { api_key, base_url })
        }
        "vertex" => {
            let project_id = non_empty(&lookup, "GCP_PROJECT_ID").ok_or(ConfigError::Missing {
                var: "GCP_PROJECT_ID",
                hint: " when GEMINI_BACKEND=vertex",
            })?;
            let location = non_empty(&lookup, "GCP_LOCATION")
                .unwrap_or_else(|| DEFAULT_GCP_LOCATION.to_string());
            Ok(ProviderSettings::Vertex {
                project_id,
                location,
            })
        }
        _ => Err(invalid(
            "GEMINI_BACKEND",
            &backend,
            "expected 'generative-language' or 'vertex'".to_string(),
        )),
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn invalid(var: &'static str, value: &str, reason: String) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "k")])).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
        assert_eq!(config.static_file, PathBuf::from("public/index.html"));
        assert_eq!(config.chat, ChatSettings::default());
        assert_eq!(config.chat.model, "models/gemini-2.5-flash");
        assert_eq!(config.chat.max_message_chars, Some(4000));
        assert_eq!(config.chat.max_body_bytes, 1024 * 1024);
        assert_eq!(config.provider, ProviderSettings::generative_language("k"));
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("GOOGLE_GENERATIVE_AI_API_KEY", "primary"),
            ("GEMINI_API_KEY", "secondary"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("STATIC_FILE", "web/chat.html"),
            ("GEMINI_MODEL", "gemini-2.5-pro"),
            ("MAX_MESSAGE_CHARS", "0"),
            ("ON_STREAM_ERROR", "truncate"),
            ("MAX_BODY_BYTES", "65536"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.static_file, PathBuf::from("web/chat.html"));
        assert_eq!(config.chat.model, "gemini-2.5-pro");
        assert_eq!(config.chat.max_message_chars, None);
        assert_eq!(config.chat.on_stream_error, OnStreamError::Truncate);
        assert_eq!(config.chat.max_body_bytes, 65536);
        assert_eq!(config.provider, ProviderSettings::generative_language("primary"));
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "k"), ("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
    }

    #[test]
    fn test_invalid_stream_error_policy() {
        let err = ServerConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("ON_STREAM_ERROR", "retry"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("ON_STREAM_ERROR"));
    }

    #[test]
    fn test_missing_api_key() {
        let err = provider_from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "GOOGLE_GENERATIVE_AI_API_KEY is required (or GEMINI_API_KEY)"
        );
    }

    #[test]
    fn test_vertex_backend() {
        let settings = provider_from_lookup(lookup(&[
            ("GEMINI_BACKEND", "vertex"),
            ("GCP_PROJECT_ID", "my-project"),
        ]))
        .unwrap();
        assert_eq!(
            settings,
            ProviderSettings::Vertex {
                project_id: "my-project".to_string(),
                location: "us-central1".to_string(),
            }
        );

        let err = provider_from_lookup(lookup(&[("GEMINI_BACKEND", "vertex")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { var: "GCP_PROJECT_ID", .. }));
    }

    #[test]
    fn test_custom_base_url() {
        let settings = provider_from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_BASE_URL", "http://127.0.0.1:8089"),
        ]))
        .unwrap();
        assert_eq!(
            settings,
            ProviderSettings::GenerativeLanguage {
                api_key: "k".to_string(),
                base_url: "http://127.0.0.1:8089".to_string(),
            }
        );
    }

    #[test]
    fn test_minimal_chat_settings() {
        let settings = ChatSettings::minimal();
        assert_eq!(settings.max_message_chars, None);
        assert_eq!(settings.on_stream_error, OnStreamError::Truncate);
    }
}

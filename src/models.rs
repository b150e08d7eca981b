// Request and response bodies of the HTTP API

use serde::{Deserialize, Serialize};
use serde_json::Value;

// POST /chat body
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub message: Option<Value>,
}

impl ChatRequest {
    /// Parse a request body leniently: anything that is not a JSON object
    /// becomes an empty request.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(mut fields)) => Self {
                message: fields.remove("message"),
            },
            _ => Self::default(),
        }
    }

    /// The `message` field if it is a string, otherwise ""
    pub fn message_text(&self) -> &str {
        self.message.as_ref().and_then(Value::as_str).unwrap_or("")
    }
}

// {"error": "..."}
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

// {"ok": true}
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_from_body() {
        let request = ChatRequest::from_body(br#"{"message":"Hello world"}"#);
        assert_eq!(request.message_text(), "Hello world");
    }

    #[test]
    fn test_chat_request_wrong_field() {
        let request = ChatRequest::from_body(br#"{"msg":"Hello world"}"#);
        assert_eq!(request.message_text(), "");
    }

    #[test]
    fn test_chat_request_non_string_message() {
        let request = ChatRequest::from_body(br#"{"message":42}"#);
        assert!(request.message.is_some());
        assert_eq!(request.message_text(), "");
    }

    #[test]
    fn test_chat_request_invalid_json() {
        let request = ChatRequest::from_body(b"{not json");
        assert!(request.message.is_none());
        assert_eq!(request.message_text(), "");
    }

    #[test]
    fn test_chat_request_non_object_json() {
        assert_eq!(ChatRequest::from_body(br#"["hi"]"#).message_text(), "");
        assert_eq!(ChatRequest::from_body(b"null").message_text(), "");
    }

    #[test]
    fn test_error_response_serialization() {
        let json = serde_json::to_string(&ErrorResponse::new("Expected application/json")).unwrap();
        assert_eq!(json, r#"{"error":"Expected application/json"}"#);
    }

    #[test]
    fn test_health_response_serialization() {
        let json = serde_json::to_string(&HealthResponse { ok: true }).unwrap();
        assert_eq!(json, r#"{"ok":true}"#);
    }
}

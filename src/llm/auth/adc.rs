//! Bearer tokens for Vertex AI from Application Default Credentials

use gcp_auth::AuthenticationManager;
use tracing::debug;

use crate::llm::core::error::LlmError;

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Source of OAuth bearer tokens for Vertex AI requests.
///
/// Credentials come from `GOOGLE_APPLICATION_CREDENTIALS`, the gcloud user login,
/// or the metadata server. `gcp_auth` caches the token and refreshes it on expiry.
pub struct AdcTokenSource {
    manager: AuthenticationManager,
}

impl AdcTokenSource {
    /// # Errors
    /// `LlmError::AuthenticationError` when no credentials can be discovered.
    pub async fn discover() -> Result<Self, LlmError> {
        let manager = AuthenticationManager::new().await.map_err(|e| {
            LlmError::AuthenticationError(format!("No Application Default Credentials: {}", e))
        })?;
        debug!("Application Default Credentials discovered");

        Ok(Self { manager })
    }

    pub async fn bearer_token(&self) -> Result<String, LlmError> {
        let token = self
            .manager
            .get_token(&[CLOUD_PLATFORM_SCOPE])
            .await
            .map_err(|e| {
                LlmError::AuthenticationError(format!("Could not obtain Vertex AI token: {}", e))
            })?;

        Ok(token.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // needs real credentials
    async fn test_bearer_token_from_adc() {
        let source = AdcTokenSource::discover().await.unwrap();
        let token = source.bearer_token().await.unwrap();
        assert!(!token.is_empty());
    }
}

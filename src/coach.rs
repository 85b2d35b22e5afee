// Client for the external commentary provider (an OpenRouter-compatible
// chat-completions API).
//
// The provider is best-effort enrichment: a missing credential, a slow
// response, or a malformed payload must never fail the caller's request.
// Callers match on the error and fall back to local text.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::config::Config;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// The analyze path must not hang on a slow provider.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, Error)]
pub enum CoachError {
    #[error("no provider credential configured")]
    Disabled,
    #[error("provider request timed out")]
    Timeout,
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned an unusable payload")]
    MalformedResponse,
}

/// Commentary provider handle. Built once at startup and shared.
#[derive(Debug, Clone)]
pub enum CoachClient {
    /// No credential configured; every completion fails fast with
    /// `CoachError::Disabled`.
    Disabled,
    Active {
        http: reqwest::Client,
        api_key: String,
        model: String,
        base_url: String,
    },
}

impl CoachClient {
    pub fn from_config(config: &Config) -> CoachClient {
        match &config.openrouter_key {
            Some(key) if !key.is_empty() => CoachClient::Active {
                http: reqwest::Client::new(),
                api_key: key.clone(),
                model: config.openrouter_model.clone(),
                base_url: config.openrouter_base_url.clone(),
            },
            _ => CoachClient::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, CoachClient::Active { .. })
    }

    /// Request one persona-voiced completion from the provider.
    pub async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> Result<String, CoachError> {
        let (http, api_key, model, base_url) = match self {
            CoachClient::Disabled => return Err(CoachError::Disabled),
            CoachClient::Active {
                http,
                api_key,
                model,
                base_url,
            } => (http, api_key, model, base_url),
        };

        let body = json!({
            "model": model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "max_tokens": max_tokens,
            "temperature": temperature,
        });

        let request = http
            .post(format!("{base_url}/chat/completions"))
            .bearer_auth(api_key)
            .json(&body)
            .send();

        let response = tokio::time::timeout(REQUEST_TIMEOUT, request)
            .await
            .map_err(|_| CoachError::Timeout)??
            .error_for_status()?;

        let parsed: ChatResponse = response.json().await?;
        extract_reply(parsed).ok_or(CoachError::MalformedResponse)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Pull the first non-empty completion out of a provider response.
fn extract_reply(response: ChatResponse) -> Option<String> {
    let text = response.choices.into_iter().next()?.message.content?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_client_fails_fast() {
        let client = CoachClient::Disabled;
        let result = client.complete("system", "user", 100, 0.8).await;
        assert!(matches!(result, Err(CoachError::Disabled)));
        assert!(!client.is_enabled());
    }

    #[test]
    fn test_extract_reply_happy_path() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"  Mantener la estructura.  "}}]}"#,
        )
        .unwrap();
        assert_eq!(
            extract_reply(response).as_deref(),
            Some("Mantener la estructura.")
        );
    }

    #[test]
    fn test_extract_reply_empty_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(extract_reply(response).is_none());

        let response: ChatResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(extract_reply(response).is_none());
    }

    #[test]
    fn test_extract_reply_blank_content() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"   "}}]}"#).unwrap();
        assert!(extract_reply(response).is_none());

        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(extract_reply(response).is_none());
    }

    #[test]
    fn test_from_config_without_key_is_disabled() {
        let config = Config {
            openrouter_key: None,
            ..Config::for_tests()
        };
        assert!(!CoachClient::from_config(&config).is_enabled());

        let config = Config {
            openrouter_key: Some(String::new()),
            ..Config::for_tests()
        };
        assert!(!CoachClient::from_config(&config).is_enabled());
    }

    #[test]
    fn test_from_config_with_key_is_active() {
        let config = Config {
            openrouter_key: Some("sk-test".into()),
            ..Config::for_tests()
        };
        let client = CoachClient::from_config(&config);
        assert!(client.is_enabled());
    }
}

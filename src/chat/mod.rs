//! Chat completion client
//!
//! One operation: send a system+user prompt pair to the chat-completion API
//! and return the first choice's text. Upstream failures (network, auth,
//! quota) surface as [`Error::Chat`]; there is no retry and no streaming.

use crate::config::ChatConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Trait over chat-completion providers
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatRequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatRequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

pub struct OpenAiChatClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl OpenAiChatClient {
    pub fn new(config: &ChatConfig, api_key: &str) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("Invalid chat base URL: {}", e)))?;
        let endpoint = Url::parse(&format!(
            "{}/chat/completions",
            base.as_str().trim_end_matches('/')
        ))
        .map_err(|e| Error::Config(format!("Invalid chat endpoint: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl ChatCompleter for OpenAiChatClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatRequestMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatRequestMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Chat(format!("Chat request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Chat(format!(
                "Chat API returned {}: {}",
                status,
                body.chars().take(300).collect::<String>()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Chat(format!("Invalid chat response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Chat("Chat API returned no choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server_uri: &str) -> ChatConfig {
        ChatConfig {
            model: "test-chat".to_string(),
            base_url: server_uri.to_string(),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_complete_sends_two_messages_and_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "model": "test-chat",
                "messages": [
                    {"role": "system", "content": "context here"},
                    {"role": "user", "content": "the question"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "the answer"}}
                ]
            })))
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new(&test_config(&server.uri()), "sk-test").unwrap();
        let text = client.complete("context here", "the question").await.unwrap();
        assert_eq!(text, "the answer");
    }

    #[tokio::test]
    async fn test_upstream_error_is_chat_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new(&test_config(&server.uri()), "sk-test").unwrap();
        let err = client.complete("s", "u").await.unwrap_err();
        assert!(matches!(err, Error::Chat(_)));
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new(&test_config(&server.uri()), "sk-test").unwrap();
        let err = client.complete("s", "u").await.unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }
}

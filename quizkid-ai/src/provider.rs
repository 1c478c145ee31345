use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::models::ProviderConfig;
use crate::traits::{ChatMessage, ModelProvider};

/// OpenAI provider implementation
pub struct OpenAIProvider {
    config: ProviderConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider with the given configuration
    pub fn new(config: ProviderConfig) -> Self {
        let client = Client::new();
        Self { config, client }
    }
}

#[async_trait]
impl ModelProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn chat(&self, messages: Vec<ChatMessage>) -> anyhow::Result<String> {
        let api_base = self.config.api_base.clone().unwrap_or_else(|| {
            "https://api.openai.com/v1".to_string()
        });

        let formatted_messages: Vec<serde_json::Value> = messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role,
                    "content": msg.content
                })
            })
            .collect();

        let request_payload = json!({
            "model": self.config.default_model,
            "messages": formatted_messages,
            "max_tokens": 2000,
        });

        tracing::debug!("Making API call to {}/chat/completions", api_base);

        let response = self.client
            .post(format!("{}/chat/completions", api_base))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request_payload)
            .send()
            .await?;

        let response_text = response.text().await?;

        let data = match serde_json::from_str::<serde_json::Value>(&response_text) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to parse API response as JSON: {:?}", e);
                return Err(anyhow::anyhow!("API returned non-JSON response: {}", e));
            }
        };

        if let Some(error) = data.get("error") {
            let error_message = error.get("message").and_then(|m| m.as_str()).unwrap_or("Unknown error");
            return Err(anyhow::anyhow!("API error: {}", error_message));
        }

        let choices = data.get("choices").and_then(|c| c.as_array())
            .ok_or_else(|| anyhow::anyhow!("Response missing 'choices' array"))?;

        if choices.is_empty() {
            return Err(anyhow::anyhow!("No completions returned"));
        }

        let message = choices[0].get("message")
            .ok_or_else(|| anyhow::anyhow!("Response choice missing 'message'"))?;

        let content = message.get("content").and_then(|c| c.as_str())
            .ok_or_else(|| anyhow::anyhow!("Response message missing 'content'"))?
            .to_string();

        Ok(content)
    }
}

/// Anthropic provider implementation
pub struct AnthropicProvider {
    config: ProviderConfig,
    client: Client,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider with the given configuration
    pub fn new(config: ProviderConfig) -> Self {
        let client = Client::new();
        Self { config, client }
    }
}

#[async_trait]
impl ModelProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn chat(&self, messages: Vec<ChatMessage>) -> anyhow::Result<String> {
        let api_base = self.config.api_base.clone().unwrap_or_else(|| {
            "https://api.anthropic.com/v1".to_string()
        });

        // Anthropic takes the system prompt as a top-level field.
        let system_message = messages.iter()
            .find(|msg| msg.role == "system")
            .map(|msg| msg.content.clone());

        let formatted_messages: Vec<serde_json::Value> = messages
            .iter()
            .filter(|msg| msg.role != "system")
            .map(|msg| {
                json!({
                    "role": msg.role,
                    "content": msg.content
                })
            })
            .collect();

        let mut request_payload = json!({
            "model": self.config.default_model,
            "messages": formatted_messages,
            "max_tokens": 2000,
        });

        if let Some(system) = system_message {
            request_payload["system"] = json!(system);
        }

        let response = self.client
            .post(format!("{}/messages", api_base))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request_payload)
            .send()
            .await?;

        let data = response.json::<serde_json::Value>().await?;

        if let Some(error) = data.get("error") {
            let error_message = error.get("message").and_then(|m| m.as_str()).unwrap_or("Unknown error");
            return Err(anyhow::anyhow!("API error: {}", error_message));
        }

        let content = data["content"].as_array()
            .ok_or_else(|| anyhow::anyhow!("Invalid response format"))?;

        let text = content.iter()
            .find(|item| item["type"].as_str() == Some("text"))
            .and_then(|item| item["text"].as_str())
            .ok_or_else(|| anyhow::anyhow!("Response missing text content"))?
            .to_string();

        Ok(text)
    }
}

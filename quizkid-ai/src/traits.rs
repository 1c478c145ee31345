use async_trait::async_trait;

/// A single chat-format message handed to a model provider.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self { role: "system".to_string(), content: content.to_string() }
    }

    pub fn user(content: &str) -> Self {
        Self { role: "user".to_string(), content: content.to_string() }
    }
}

/// A chat-completion backend. Quiz generation needs exactly one round
/// trip, so this stays a minimal surface.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn chat(&self, messages: Vec<ChatMessage>) -> anyhow::Result<String>;
}

use async_trait::async_trait;

use crate::history::{ChatMessage, ChatRole};

#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub task: String,
    pub system_prompt: String,
    pub messages: Vec<ChatMessage>,
}

#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn complete(&self, request: ModelRequest) -> anyhow::Result<String>;
}

#[derive(Debug, Default)]
pub struct MockModelProvider;

#[async_trait]
impl ModelProvider for MockModelProvider {
    async fn complete(&self, request: ModelRequest) -> anyhow::Result<String> {
        let last_user = request
            .messages
            .iter()
            .rev()
            .find(|message| message.role == ChatRole::User)
            .map(|message| message.content.as_str())
            .unwrap_or_default();
        Ok(format!("chatrails mock reply: {last_user}"))
    }
}

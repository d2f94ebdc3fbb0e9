use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Flattens `[(user, assistant), ...]` turn pairs into the ordered
/// role-tagged message list a chat model expects.
pub fn flatten_history(pairs: &[(String, String)]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(pairs.len() * 2);
    for (user_message, bot_message) in pairs {
        messages.push(ChatMessage {
            role: ChatRole::User,
            content: user_message.clone(),
        });
        messages.push(ChatMessage {
            role: ChatRole::Assistant,
            content: bot_message.clone(),
        });
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::{ChatRole, flatten_history};

    #[test]
    fn empty_history_flattens_to_nothing() {
        assert!(flatten_history(&[]).is_empty());
    }

    #[test]
    fn pairs_flatten_in_order_with_alternating_roles() {
        let pairs = vec![
            ("hi".to_owned(), "hello".to_owned()),
            ("how are you".to_owned(), "fine".to_owned()),
        ];

        let messages = flatten_history(&pairs);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[0].content, "hi");
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(messages[1].content, "hello");
        assert_eq!(messages[2].role, ChatRole::User);
        assert_eq!(messages[2].content, "how are you");
        assert_eq!(messages[3].role, ChatRole::Assistant);
        assert_eq!(messages[3].content, "fine");
    }
}

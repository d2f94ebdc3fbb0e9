use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize)]
pub struct LlmCallRecord {
    pub task: String,
    pub prompt: String,
    pub completion: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only in-process log of model calls, shared across requests.
#[derive(Debug, Default, Clone)]
pub struct CallLog {
    calls: Arc<RwLock<Vec<LlmCallRecord>>>,
}

impl CallLog {
    pub async fn record(&self, task: &str, prompt: &str, completion: &str) {
        self.calls.write().await.push(LlmCallRecord {
            task: task.to_owned(),
            prompt: prompt.to_owned(),
            completion: completion.to_owned(),
            timestamp: Utc::now(),
        });
    }

    pub async fn calls(&self) -> Vec<LlmCallRecord> {
        self.calls.read().await.clone()
    }

    pub async fn summary(&self) -> String {
        render_summary(&self.calls().await)
    }
}

pub fn render_summary(calls: &[LlmCallRecord]) -> String {
    let mut lines = vec![format!("{} LLM call(s) recorded", calls.len())];
    for (index, call) in calls.iter().enumerate() {
        lines.push(format!("--- call {} ---", index + 1));
        lines.push(format!("task: {}", call.task));
        lines.push(format!("prompt: {}", call.prompt));
        lines.push(format!("completion: {}", call.completion));
    }
    lines.join("\n")
}

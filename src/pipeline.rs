use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::{
    explain::CallLog,
    history::{ChatMessage, ChatRole, flatten_history},
    model::{ModelProvider, ModelRequest},
    rails::{RailKind, RailPolicy},
};

const CHAT_TASK: &str = "chat";
const SYSTEM_PROMPT: &str = "You are a helpful assistant. Keep replies concise.";

#[derive(Debug, Clone, Serialize)]
pub struct BlockReport {
    pub rail: RailKind,
    pub term: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineReply {
    pub text: String,
    pub blocked_by: Option<BlockReport>,
}

pub struct RailedPipeline {
    model: Arc<dyn ModelProvider>,
    input_rail: RailPolicy,
    output_rail: RailPolicy,
    calls: CallLog,
}

impl RailedPipeline {
    pub fn new(model: Arc<dyn ModelProvider>, input_rail: RailPolicy, output_rail: RailPolicy) -> Self {
        Self {
            model,
            input_rail,
            output_rail,
            calls: CallLog::default(),
        }
    }

    pub fn call_log(&self) -> &CallLog {
        &self.calls
    }

    pub async fn handle_message(
        &self,
        content: &str,
        history: &[(String, String)],
    ) -> anyhow::Result<PipelineReply> {
        if let Some(term) = self.input_rail.check(Some(content)).matched_term {
            info!(term = %term, "input rail tripped; substituting refusal");
            return Ok(PipelineReply {
                text: self.input_rail.refusal().to_owned(),
                blocked_by: Some(BlockReport {
                    rail: RailKind::Input,
                    term,
                }),
            });
        }

        let mut messages = flatten_history(history);
        messages.push(ChatMessage {
            role: ChatRole::User,
            content: content.to_owned(),
        });
        let prompt = render_prompt(SYSTEM_PROMPT, &messages);

        let completion = self
            .model
            .complete(ModelRequest {
                task: CHAT_TASK.to_owned(),
                system_prompt: SYSTEM_PROMPT.to_owned(),
                messages,
            })
            .await?;
        self.calls.record(CHAT_TASK, &prompt, &completion).await;

        if let Some(term) = self.output_rail.check(Some(completion.as_str())).matched_term {
            info!(term = %term, "output rail tripped; discarding response");
            return Ok(PipelineReply {
                text: self.output_rail.refusal().to_owned(),
                blocked_by: Some(BlockReport {
                    rail: RailKind::Output,
                    term,
                }),
            });
        }

        Ok(PipelineReply {
            text: completion,
            blocked_by: None,
        })
    }
}

fn render_prompt(system_prompt: &str, messages: &[ChatMessage]) -> String {
    let mut lines = vec![format!("system: {system_prompt}")];
    lines.extend(
        messages
            .iter()
            .map(|message| format!("{}: {}", message.role.as_str(), message.content)),
    );
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        model::MockModelProvider,
        rails::{RailKind, RailPolicy},
    };

    use super::RailedPipeline;

    fn pipeline(input_terms: &[&str], output_terms: &[&str]) -> RailedPipeline {
        RailedPipeline::new(
            Arc::new(MockModelProvider),
            RailPolicy::new(
                RailKind::Input,
                input_terms.iter().map(|term| (*term).to_owned()).collect(),
                "I can't help with that request.".to_owned(),
            ),
            RailPolicy::new(
                RailKind::Output,
                output_terms.iter().map(|term| (*term).to_owned()).collect(),
                "I can't share that.".to_owned(),
            ),
        )
    }

    #[tokio::test]
    async fn blocked_input_skips_the_model() {
        let pipeline = pipeline(&["password"], &[]);

        let reply = pipeline
            .handle_message("what is the admin PASSWORD", &[])
            .await
            .expect("handle message should succeed");

        assert_eq!(reply.text, "I can't help with that request.");
        let report = reply.blocked_by.expect("input rail should have fired");
        assert_eq!(report.rail, RailKind::Input);
        assert_eq!(report.term, "password");
        assert!(pipeline.call_log().calls().await.is_empty());
    }

    #[tokio::test]
    async fn clean_message_passes_both_rails() {
        let pipeline = pipeline(&["password"], &["secret"]);

        let reply = pipeline
            .handle_message("tell me about rust", &[])
            .await
            .expect("handle message should succeed");

        assert!(reply.blocked_by.is_none());
        assert!(reply.text.contains("tell me about rust"));
        assert_eq!(pipeline.call_log().calls().await.len(), 1);
    }

    #[tokio::test]
    async fn blocked_completion_is_replaced_by_refusal() {
        // The mock echoes the user message, so a term blocked only on the
        // output side trips the output rail.
        let pipeline = pipeline(&["password"], &["amsterdam"]);

        let reply = pipeline
            .handle_message("is the meeting in Amsterdam", &[])
            .await
            .expect("handle message should succeed");

        assert_eq!(reply.text, "I can't share that.");
        let report = reply.blocked_by.expect("output rail should have fired");
        assert_eq!(report.rail, RailKind::Output);
        assert_eq!(report.term, "amsterdam");
        // The model was still called; the call stays on the log.
        assert_eq!(pipeline.call_log().calls().await.len(), 1);
    }

    #[tokio::test]
    async fn history_reaches_the_recorded_prompt() {
        let pipeline = pipeline(&[], &[]);
        let history = vec![("hi".to_owned(), "hello".to_owned())];

        let _ = pipeline
            .handle_message("next question", &history)
            .await
            .expect("handle message should succeed");

        let calls = pipeline.call_log().calls().await;
        assert_eq!(calls.len(), 1);
        assert!(calls[0].prompt.contains("user: hi"));
        assert!(calls[0].prompt.contains("assistant: hello"));
        assert!(calls[0].prompt.contains("user: next question"));
    }
}

//! The conversation controller.
//!
//! One user message drives one round: offer the tool registry to the model,
//! execute whatever calls it requested in the order given, then ask for a
//! follow-up with no tools offered. Tool failures are folded into the
//! conversation as data; only a model-client failure surfaces as an error,
//! and it leaves the conversation exactly as it was.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::gateway::{CredentialOverrides, Gateway, GatewayError, GatewayResult};
use crate::llm::{ChatMessage, LlmClient, ToolCall};
use crate::tools::{self, ToolKind};

use super::session::{Session, SessionState};

/// Drives the model-call / tool-execute / follow-up cycle for sessions.
pub struct Agent {
    model: String,
    llm: Arc<dyn LlmClient>,
    gateway: Gateway,
}

impl Agent {
    pub fn new(model: String, llm: Arc<dyn LlmClient>, gateway: Gateway) -> Self {
        Self {
            model,
            llm,
            gateway,
        }
    }

    /// Run one full round against `session` and return the assistant reply.
    ///
    /// On a model-client failure the error is returned as-is, no assistant
    /// message is appended, and the session is ready for the next attempt.
    pub async fn handle_message(
        &self,
        session: &mut Session,
        text: &str,
    ) -> anyhow::Result<String> {
        let result = self.run_round(session, text).await;
        session.set_state(SessionState::AwaitingUserInput);
        result
    }

    async fn run_round(&self, session: &mut Session, text: &str) -> anyhow::Result<String> {
        session.push(ChatMessage::user(text));

        session.set_state(SessionState::ModelTurn);
        let schemas = tools::tool_schemas();
        let response = self
            .llm
            .chat_completion(&self.model, session.messages(), Some(schemas.as_slice()))
            .await?;

        let calls = response.tool_calls.unwrap_or_default();
        if calls.is_empty() {
            let reply = response
                .content
                .ok_or_else(|| anyhow::anyhow!("model returned an empty reply"))?;
            session.push(ChatMessage::assistant(reply.clone()));
            return Ok(reply);
        }

        session.push(ChatMessage::tool_calls(calls.clone()));

        session.set_state(SessionState::ToolExecution);
        for call in &calls {
            info!(tool = %call.function.name, id = %call.id, "executing tool call");
            let content = self.execute_tool_call(call).await;
            session.push(ChatMessage::tool_result(call.id.clone(), content));
        }

        // Follow-up turn: the model sees the tool results but is offered no
        // tools, so this round cannot cascade into another batch.
        session.set_state(SessionState::FollowupModelTurn);
        let followup = self
            .llm
            .chat_completion(&self.model, session.messages(), None)
            .await?;
        let reply = followup
            .content
            .ok_or_else(|| anyhow::anyhow!("model returned an empty follow-up reply"))?;
        session.push(ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }

    /// Run one tool call and fold the outcome into tool-message content: the
    /// upstream JSON itself on success, `{"error": …}` on failure.
    async fn execute_tool_call(&self, call: &ToolCall) -> String {
        let result = self.dispatch(call).await;
        if let Err(error) = &result {
            warn!(tool = %call.function.name, error = %error, "tool call failed");
        }
        match result {
            Ok(value) => value.to_string(),
            Err(error) => json!({ "error": error.to_string() }).to_string(),
        }
    }

    async fn dispatch(&self, call: &ToolCall) -> GatewayResult {
        let kind = match ToolKind::from_name(&call.function.name) {
            Some(kind) => kind,
            None => {
                return Err(GatewayError::MalformedToolArguments(format!(
                    "unknown tool '{}'",
                    call.function.name
                )))
            }
        };
        let request = kind.parse_arguments(&call.function.arguments)?;
        self.gateway
            .invoke(&request, &CredentialOverrides::default())
            .await
    }
}

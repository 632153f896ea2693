//! Model client: the seam between the conversation controller and the
//! chat-completions provider.

#[cfg(test)]
pub(crate) mod mock;
mod openai;
mod types;

pub use openai::{OpenAiClient, DEFAULT_OPENAI_BASE_URL};
pub use types::{ChatMessage, ChatResponse, FunctionCall, Role, ToolCall};

use async_trait::async_trait;
use serde_json::Value;

/// A chat-completions provider.
///
/// `tools` is the set of function schemas offered for this turn; `None`
/// solicits a plain reply. Implementations must not retry on failure.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[Value]>,
    ) -> anyhow::Result<ChatResponse>;
}

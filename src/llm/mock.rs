//! Scripted model client for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::types::{ChatMessage, ChatResponse, FunctionCall, ToolCall};
use super::LlmClient;

/// What one scripted call saw.
pub(crate) struct RecordedRequest {
    pub(crate) message_count: usize,
    pub(crate) tools_offered: bool,
}

/// Replays a fixed sequence of responses and records what each call was
/// given. Panics if the script runs dry, which in a test is the right thing.
pub(crate) struct ScriptedLlm {
    script: Mutex<VecDeque<anyhow::Result<ChatResponse>>>,
    pub(crate) requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedLlm {
    pub(crate) fn new(script: Vec<anyhow::Result<ChatResponse>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn recorded(&self) -> Vec<RecordedRequest> {
        std::mem::take(&mut *self.requests.lock().unwrap())
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn chat_completion(
        &self,
        _model: &str,
        messages: &[ChatMessage],
        tools: Option<&[Value]>,
    ) -> anyhow::Result<ChatResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            message_count: messages.len(),
            tools_offered: tools.is_some(),
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted responses exhausted")
    }
}

/// A reply with no tool calls.
pub(crate) fn reply(content: &str) -> anyhow::Result<ChatResponse> {
    Ok(ChatResponse {
        content: Some(content.to_string()),
        tool_calls: None,
    })
}

/// A turn that requests the given tool calls and says nothing else.
pub(crate) fn call_tools(calls: Vec<ToolCall>) -> anyhow::Result<ChatResponse> {
    Ok(ChatResponse {
        content: None,
        tool_calls: Some(calls),
    })
}

pub(crate) fn tool_call(id: &str, name: &str, arguments: &str) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        call_type: "function".to_string(),
        function: FunctionCall {
            name: name.to_string(),
            arguments: arguments.to_string(),
        },
    }
}

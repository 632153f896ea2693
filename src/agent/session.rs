//! Per-session conversation state.

use serde::Serialize;
use uuid::Uuid;

use crate::llm::ChatMessage;

use super::prompt;

/// Immutable per-session parameters. They only seed the opening messages;
/// changing them later would not rewrite the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionSettings {
    pub capital: f64,
    pub profit_target: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            capital: 30_000.0,
            profit_target: 50.0,
        }
    }
}

/// Controller position within a round. Between rounds a session always sits
/// at `AwaitingUserInput`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    AwaitingUserInput,
    ModelTurn,
    ToolExecution,
    FollowupModelTurn,
}

/// One conversation with the assistant.
///
/// The message list is append-only: entries are never reordered, rewritten,
/// or removed once pushed, so earlier rounds stay byte-for-byte stable.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub settings: SessionSettings,
    state: SessionState,
    messages: Vec<ChatMessage>,
    pub created_at: String,
}

impl Session {
    /// Open a session seeded with the system prompt and the opening greeting.
    pub fn new(settings: SessionSettings) -> Self {
        let messages = vec![
            ChatMessage::system(prompt::build_system_prompt(&settings)),
            ChatMessage::assistant(prompt::initial_greeting(&settings)),
        ];
        Self {
            id: Uuid::new_v4(),
            settings,
            state: SessionState::AwaitingUserInput,
            messages,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The conversation so far.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The greeting seeded at construction.
    pub fn greeting(&self) -> &str {
        self.messages
            .get(1)
            .and_then(|m| m.content.as_deref())
            .unwrap_or_default()
    }

    pub(super) fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub(super) fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }
}

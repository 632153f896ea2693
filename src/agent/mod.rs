//! Agent module - the conversation controller and its session state.
//!
//! Each user message drives one fixed round:
//! 1. Append the user message to the session's conversation
//! 2. Call the model with the registered tool schemas
//! 3. Execute requested tool calls through the gateway, in order, folding
//!    every outcome (failures included) back in as tool messages
//! 4. Call the model again with no tools offered and append its reply

mod controller;
mod prompt;
mod session;

pub use controller::Agent;
pub use session::{Session, SessionSettings, SessionState};

//! # tradedesk
//!
//! A conversational trading assistant: a language model drives a brokerage
//! API and a market-data API through a credential-injecting gateway.
//!
//! This library provides:
//! - A gateway that forwards generic path/params requests to either upstream,
//!   resolving credentials per call and normalizing every failure into data
//! - A conversation controller that runs the model-call / tool-execute /
//!   follow-up cycle for each user message
//! - An HTTP API exposing the gateway boundary and the session surface
//!
//! ## Architecture
//!
//! Each user message drives one round:
//! 1. Append the user message to the session's conversation
//! 2. Call the model with the registered tool schemas
//! 3. Execute requested calls through the gateway, in order, appending every
//!    outcome (failures included) as tool messages
//! 4. Call the model again with no tools offered and append its reply
//!
//! ## Example
//!
//! ```rust,ignore
//! use tradedesk::{api, config::Config};
//!
//! let config = Config::from_env()?;
//! api::serve(config).await?;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod gateway;
pub mod llm;
pub mod tools;

#[cfg(test)]
mod testutil;

pub use config::Config;

//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Model providers (OpenAI chat completions, an offline mock)
//! - The relay's HTTP API and the client that calls it
//! - Terminal rendering of a conversation

pub mod adapter;
pub mod api;
pub mod terminal;

pub use adapter::*;
pub use api::*;

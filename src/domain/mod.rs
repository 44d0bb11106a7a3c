//! # Domain Layer
//!
//! Conversation models, the answer parser, and the error type.
//! This layer is independent of HTTP, the model provider and the terminal.

pub mod error;
pub mod models;
pub mod services;

pub use error::*;
pub use models::*;
pub use services::*;

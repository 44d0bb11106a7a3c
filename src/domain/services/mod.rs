//! Pure domain logic.

mod response_parser;

pub use response_parser::*;

pub mod ask_question_controller;

pub use ask_question_controller::*;

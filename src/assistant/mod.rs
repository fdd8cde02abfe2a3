//! Conversational capture: classify a WhatsApp message with a hosted model
//! and turn the chosen tool call into exactly one stored record.

pub mod classifier;
pub mod executor;
pub mod openai;
pub mod prompt;
pub mod tools;

pub use classifier::{Intent, IntentClassifier};
pub use executor::execute;
pub use openai::OpenAiClassifier;
pub use tools::ToolCall;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::ToolCall;
use crate::error::Result;

/// What the model decided to do with a message
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Persist one record
    Tool(ToolCall),
    /// No tool call; relay the model's text as-is
    Reply(String),
    /// A tool call we cannot act on, with the tool name the model used
    Unrecognized(String),
}

/// Hosted-model seam; the webhook only sees this trait
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, text: &str, today: NaiveDate) -> Result<Intent>;
}

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::prompt::system_prompt;
use super::tools::{self, ToolCall};
use super::{Intent, IntentClassifier};
use crate::config::Config;
use crate::error::{AppError, Result};

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub tools: Vec<Value>,
    pub tool_choice: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    /// Some providers send `null` instead of omitting the field
    #[serde(default)]
    pub tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseToolCall {
    pub function: FunctionCall,
}

#[derive(Debug, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments object
    #[serde(default)]
    pub arguments: String,
}

/// Intent classifier backed by an OpenAI-compatible chat completions API
#[derive(Clone)]
pub struct OpenAiClassifier {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClassifier {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Assemble the completion request for one user message
pub fn build_request<'a>(model: &'a str, system: &'a str, text: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: text,
            },
        ],
        tools: tools::definitions(),
        tool_choice: "auto",
    }
}

/// Turn the model's reply into an [`Intent`]
///
/// Only the first tool call is considered. Unknown tool names and arguments
/// that do not fit the schema both become [`Intent::Unrecognized`].
pub fn interpret(message: ResponseMessage) -> Intent {
    let mut calls = message.tool_calls.unwrap_or_default().into_iter();

    let Some(first) = calls.next() else {
        return Intent::Reply(message.content.unwrap_or_default());
    };

    let discarded = calls.count();
    if discarded > 0 {
        tracing::warn!(
            "Model returned {} extra tool call(s); only {} will run",
            discarded,
            first.function.name
        );
    }

    match ToolCall::parse(&first.function.name, &first.function.arguments) {
        Ok(Some(call)) => Intent::Tool(call),
        Ok(None) => {
            tracing::warn!("Model chose unknown tool {}", first.function.name);
            Intent::Unrecognized(first.function.name)
        }
        Err(e) => {
            tracing::warn!(
                "Invalid arguments for tool {}: {} ({})",
                first.function.name,
                e,
                first.function.arguments
            );
            Intent::Unrecognized(first.function.name)
        }
    }
}

#[async_trait]
impl IntentClassifier for OpenAiClassifier {
    async fn classify(&self, text: &str, today: NaiveDate) -> Result<Intent> {
        let system = system_prompt(today);
        let request = build_request(&self.model, &system, text);

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AppError::LanguageModel(format!("{}: {}", status, body)));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        let message = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| AppError::LanguageModel("response had no choices".to_string()))?;

        Ok(interpret(message))
    }
}

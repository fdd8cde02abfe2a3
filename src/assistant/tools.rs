use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use crate::models::{Category, Priority, Repeat};

pub const CREATE_TODO: &str = "create_todo";
pub const CREATE_BOOKMARK: &str = "create_bookmark";
pub const CREATE_NOTE: &str = "create_note";
pub const CREATE_REMINDER: &str = "create_reminder";
pub const DAILY_LOG: &str = "daily_log";

/// A capture action chosen by the model, with validated arguments
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    CreateTodo(CreateTodoArgs),
    CreateBookmark(CreateBookmarkArgs),
    CreateNote(CreateNoteArgs),
    CreateReminder(CreateReminderArgs),
    /// A note titled after today's date
    DailyLog(DailyLogArgs),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateTodoArgs {
    pub title: String,
    #[serde(default, deserialize_with = "optional_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub category: Option<Category>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateBookmarkArgs {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateNoteArgs {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateReminderArgs {
    pub title: String,
    #[serde(deserialize_with = "required_date")]
    pub date: NaiveDate,
    #[serde(deserialize_with = "clock_time")]
    pub time: NaiveTime,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub repeat: Option<Repeat>,
    #[serde(default)]
    pub category: Option<Category>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyLogArgs {
    pub content: String,
}

impl ToolCall {
    /// Decode a function call returned by the model
    ///
    /// `Ok(None)` means the name is not one of ours. Arguments arrive as a
    /// JSON-encoded string and must match the tool's schema.
    pub fn parse(name: &str, arguments: &str) -> Result<Option<Self>, serde_json::Error> {
        let call = match name {
            CREATE_TODO => Self::CreateTodo(serde_json::from_str(arguments)?),
            CREATE_BOOKMARK => Self::CreateBookmark(serde_json::from_str(arguments)?),
            CREATE_NOTE => Self::CreateNote(serde_json::from_str(arguments)?),
            CREATE_REMINDER => Self::CreateReminder(serde_json::from_str(arguments)?),
            DAILY_LOG => Self::DailyLog(serde_json::from_str(arguments)?),
            _ => return Ok(None),
        };
        Ok(Some(call))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateTodo(_) => CREATE_TODO,
            Self::CreateBookmark(_) => CREATE_BOOKMARK,
            Self::CreateNote(_) => CREATE_NOTE,
            Self::CreateReminder(_) => CREATE_REMINDER,
            Self::DailyLog(_) => DAILY_LOG,
        }
    }
}

/// Tool schemas in the chat completions `tools` format
pub fn definitions() -> Vec<Value> {
    vec![
        function(
            CREATE_TODO,
            "Create a new todo item. A due date can be provided.",
            json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string", "description": "The title of the todo." },
                    "due_date": {
                        "type": "string",
                        "description": "The due date for the todo in YYYY-MM-DD format (e.g., \"2024-07-26\")."
                    },
                    "priority": { "type": "string", "enum": ["High", "Medium", "Low"] },
                    "category": { "type": "string", "enum": ["Work", "Health", "Personal", "Finance"] }
                },
                "required": ["title"]
            }),
        ),
        function(
            CREATE_BOOKMARK,
            "Save a link as a bookmark with a URL and a title. The title should be descriptive and summarize the content of the URL. Use this for saving links, not for conversational responses.",
            json!({
                "type": "object",
                "properties": {
                    "url": { "type": "string", "description": "The URL of the bookmark to save." },
                    "title": {
                        "type": "string",
                        "description": "A concise summary of the content at the URL."
                    },
                    "description": { "type": "string", "description": "Optional longer description." }
                },
                "required": ["url", "title"]
            }),
        ),
        function(
            CREATE_NOTE,
            "Create a new note.",
            json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string", "description": "The title of the note." },
                    "content": { "type": "string", "description": "The content of the note." }
                },
                "required": ["title", "content"]
            }),
        ),
        function(
            CREATE_REMINDER,
            "Create a new reminder with a specific date and time.",
            json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string", "description": "The title of the reminder." },
                    "date": {
                        "type": "string",
                        "description": "The date for the reminder in YYYY-MM-DD format (e.g., \"2024-07-26\")."
                    },
                    "time": {
                        "type": "string",
                        "description": "The time for the reminder in HH:MM:SS format (e.g., \"15:30:00\")."
                    },
                    "description": { "type": "string" },
                    "repeat": { "type": "string", "enum": ["Daily", "Weekly", "Monthly", "None"] },
                    "category": { "type": "string", "enum": ["Work", "Health", "Personal", "Finance"] }
                },
                "required": ["title", "date", "time"]
            }),
        ),
        function(
            DAILY_LOG,
            "Create a daily log, which is a note titled with today's date.",
            json!({
                "type": "object",
                "properties": {
                    "content": { "type": "string", "description": "The content of the daily log." }
                },
                "required": ["content"]
            }),
        ),
    ]
}

fn function(name: &str, description: &str, parameters: Value) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": name,
            "description": description,
            "parameters": parameters,
        }
    })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Accepts `HH:MM:SS` and the `HH:MM` models sometimes send
fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

fn required_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("expected YYYY-MM-DD, got {:?}", raw)))
}

/// Null and empty strings both mean "no date"
fn optional_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_date(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("expected YYYY-MM-DD, got {:?}", raw))),
    }
}

fn clock_time<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_clock_time(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("expected HH:MM:SS, got {:?}", raw)))
}

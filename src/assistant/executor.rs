use chrono::NaiveDate;

use super::ToolCall;
use crate::db::{self, Db};
use crate::error::Result;
use crate::models::{NewBookmark, NewNote, NewReminder, NewTodo};

/// Title given to notes created through `daily_log`, e.g. `Daily Log - October 17, 2026`
pub fn daily_log_title(today: NaiveDate) -> String {
    format!("Daily Log - {}", long_date(today))
}

fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Perform the single insert a tool call asks for, on behalf of `user_id`
///
/// Returns the confirmation text sent back to the user.
pub async fn execute(db: &Db, user_id: &str, call: ToolCall, today: NaiveDate) -> Result<String> {
    let reply = match call {
        ToolCall::CreateTodo(args) => {
            let todo = NewTodo {
                title: args.title,
                priority: args.priority,
                due_date: args.due_date,
                reminder_time: None,
                category: args.category,
            };
            let created = db::todos::create(db, user_id, &todo).await?;
            match created.due_date {
                Some(due) => format!(
                    "Todo '{}' created with due date {}.",
                    created.title,
                    due.format("%Y-%m-%d")
                ),
                None => format!("Todo '{}' created.", created.title),
            }
        }
        ToolCall::CreateBookmark(args) => {
            let bookmark = NewBookmark {
                title: args.title,
                url: args.url,
                description: args.description,
                tags: None,
            };
            let created = db::bookmarks::create(db, user_id, &bookmark).await?;
            format!("Bookmark '{}' created.", created.title)
        }
        ToolCall::CreateNote(args) => {
            let note = NewNote {
                title: args.title,
                content: args.content,
            };
            let created = db::notes::create(db, user_id, &note).await?;
            format!("Note '{}' created.", created.title)
        }
        ToolCall::CreateReminder(args) => {
            let reminder = NewReminder {
                title: args.title,
                description: args.description,
                time: Some(args.time),
                date: Some(args.date),
                repeat: args.repeat,
                category: args.category,
            };
            let created = db::reminders::create(db, user_id, &reminder).await?;
            format!(
                "Reminder for '{}' set for {} at {}.",
                created.title,
                args.date.format("%Y-%m-%d"),
                args.time.format("%H:%M:%S")
            )
        }
        ToolCall::DailyLog(args) => {
            let note = NewNote {
                title: daily_log_title(today),
                content: args.content,
            };
            db::notes::create(db, user_id, &note).await?;
            format!("Daily log for {} created.", long_date(today))
        }
    };

    Ok(reply)
}

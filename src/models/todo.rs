use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Todo row owned by a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub reminder_time: Option<String>,
    pub category: Option<Category>,
    pub user_id: String,
}

/// Fields supplied when creating a todo; `completed` always starts false
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub title: String,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub reminder_time: Option<String>,
    pub category: Option<Category>,
}

/// Full replacement of a todo's editable fields
///
/// `completed: None` leaves the flag untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdate {
    pub title: String,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub reminder_time: Option<String>,
    pub category: Option<Category>,
    pub completed: Option<bool>,
}

impl NewTodo {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_serializes_camel_case() {
        let todo = Todo {
            id: 7,
            title: "File taxes".to_string(),
            completed: false,
            priority: Some(Priority::High),
            due_date: NaiveDate::from_ymd_opt(2025, 4, 15),
            reminder_time: None,
            category: Some(Category::Finance),
            user_id: "user-1".to_string(),
        };

        let value = serde_json::to_value(&todo).unwrap();
        assert_eq!(value["dueDate"], "2025-04-15");
        assert_eq!(value["priority"], "High");
        assert_eq!(value["category"], "Finance");
        assert_eq!(value["userId"], "user-1");
    }
}

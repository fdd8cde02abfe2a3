use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Repeat {
    Daily,
    Weekly,
    Monthly,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub time: Option<NaiveTime>,
    pub date: Option<NaiveDate>,
    pub repeat: Option<Repeat>,
    pub enabled: bool,
    pub category: Option<Category>,
    pub user_id: String,
}

/// Fields supplied when creating or replacing a reminder
///
/// `enabled` is not part of the input; it starts true and only changes via toggle.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewReminder {
    pub title: String,
    pub description: Option<String>,
    pub time: Option<NaiveTime>,
    pub date: Option<NaiveDate>,
    pub repeat: Option<Repeat>,
    pub category: Option<Category>,
}

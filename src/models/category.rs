use serde::{Deserialize, Serialize};

/// Life area shared by todos and reminders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Category {
    Work,
    Health,
    Personal,
    Finance,
}

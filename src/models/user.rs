use serde::{Deserialize, Serialize};

/// Account provisioned by the authentication provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Digits only, see [`User::normalize_phone_number`]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

impl User {
    /// Reduce a phone number to its digits
    ///
    /// WhatsApp reports senders as bare international digits (`15551234567`)
    /// while people type `+1 (555) 123-4567` at sign-up.
    pub fn normalize_phone_number(raw: &str) -> String {
        raw.chars().filter(|c| c.is_ascii_digit()).collect()
    }
}

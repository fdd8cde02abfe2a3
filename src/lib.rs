//! Capture Server Library
//!
//! WhatsApp-driven capture of todos, notes, bookmarks and reminders.
//! This module exports the core types and functions for testing and reuse.

pub mod assistant;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod whatsapp;

pub use config::Config;
pub use db::{create_pool, run_migrations, Db};
pub use error::{AppError, Result};

use std::sync::Arc;

use assistant::{IntentClassifier, OpenAiClassifier};
use whatsapp::{MessageSender, WhatsAppClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Config,
    pub classifier: Arc<dyn IntentClassifier>,
    pub messenger: Arc<dyn MessageSender>,
}

impl AppState {
    /// Wire up the hosted model and WhatsApp clients from configuration
    pub fn new(db: Db, config: Config) -> Self {
        let http = reqwest::Client::new();
        let classifier = Arc::new(OpenAiClassifier::new(http.clone(), &config));
        let messenger = Arc::new(WhatsAppClient::new(http, &config));

        Self {
            db,
            config,
            classifier,
            messenger,
        }
    }
}

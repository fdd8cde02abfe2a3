use std::env;

use crate::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL, DEFAULT_WHATSAPP_API_BASE,
};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub environment: String,
    /// Secret echoed back by Meta during the webhook handshake
    pub whatsapp_verify_token: String,
    /// App secret used to check `X-Hub-Signature-256`; verification is skipped when unset
    pub whatsapp_app_secret: Option<String>,
    pub whatsapp_access_token: String,
    pub whatsapp_phone_number_id: String,
    pub whatsapp_api_base: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let required = |key: &str| lookup(key).ok_or_else(|| format!("{} must be set", key));

        let server_host = or_default("SERVER_HOST", "0.0.0.0");
        let server_port = or_default("SERVER_PORT", "8080")
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let database_url = or_default("DATABASE_URL", DEFAULT_DATABASE_URL);
        let environment = or_default("ENVIRONMENT", "development");

        let whatsapp_verify_token = required("WHATSAPP_VERIFY_TOKEN")?;
        let whatsapp_access_token = required("WHATSAPP_ACCESS_TOKEN")?;
        let whatsapp_phone_number_id = required("WHATSAPP_PHONE_NUMBER_ID")?;
        let whatsapp_app_secret = lookup("WHATSAPP_APP_SECRET").filter(|s| !s.is_empty());
        let whatsapp_api_base = or_default("WHATSAPP_API_BASE", DEFAULT_WHATSAPP_API_BASE);

        let openai_api_key = required("OPENAI_API_KEY")?;
        let openai_base_url = or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL);
        let openai_model = or_default("OPENAI_MODEL", DEFAULT_OPENAI_MODEL);

        Ok(Config {
            server_host,
            server_port,
            database_url,
            environment,
            whatsapp_verify_token,
            whatsapp_app_secret,
            whatsapp_access_token,
            whatsapp_phone_number_id,
            whatsapp_api_base,
            openai_api_key,
            openai_base_url,
            openai_model,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

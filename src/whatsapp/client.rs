use async_trait::async_trait;
use serde_json::json;

use crate::config::Config;
use crate::error::Result;

/// Outbound text channel back to the user
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Deliver `body` to the phone number `to`
    ///
    /// Errors only when no HTTP response was obtained; a rejected message is
    /// logged and otherwise treated as sent.
    async fn send_text(&self, to: &str, body: &str) -> Result<()>;
}

/// WhatsApp Cloud API sender
#[derive(Clone)]
pub struct WhatsAppClient {
    http: reqwest::Client,
    api_base: String,
    phone_number_id: String,
    access_token: String,
}

impl WhatsAppClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            api_base: config.whatsapp_api_base.trim_end_matches('/').to_string(),
            phone_number_id: config.whatsapp_phone_number_id.clone(),
            access_token: config.whatsapp_access_token.clone(),
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/{}/messages", self.api_base, self.phone_number_id)
    }
}

/// JSON body for a plain text message
pub fn text_message_body(to: &str, body: &str) -> serde_json::Value {
    json!({
        "messaging_product": "whatsapp",
        "recipient_type": "individual",
        "to": to,
        "type": "text",
        "text": { "preview_url": false, "body": body },
    })
}

#[async_trait]
impl MessageSender for WhatsAppClient {
    async fn send_text(&self, to: &str, body: &str) -> Result<()> {
        let response = self
            .http
            .post(self.messages_url())
            .bearer_auth(&self.access_token)
            .json(&text_message_body(to, body))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!("WhatsApp rejected message to {}: {} {}", to, status, text);
            return Ok(());
        }

        tracing::info!("Reply sent to {}", to);
        Ok(())
    }
}

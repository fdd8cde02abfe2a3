use serde::Deserialize;

/// Webhook notification envelope
///
/// Only the fields needed to reach `entry[].changes[].value.messages[]` are
/// modelled; everything else Meta sends is ignored. Every level is optional
/// and accepts `null`, so an unexpected shape reads as "no message" instead
/// of failing the delivery.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub entry: Option<Vec<Entry>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub changes: Option<Vec<Change>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub value: Option<ChangeValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Message {
    /// Sender phone number, international digits without `+`
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub text: Option<TextBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub body: Option<String>,
}

/// A text message pulled out of a webhook delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundText {
    pub from: String,
    pub body: String,
}

impl WebhookPayload {
    /// The first message of the first change, if it carries a sender and text
    ///
    /// Status callbacks (sent/delivered/read), media messages and partial
    /// envelopes yield `None`.
    pub fn first_text_message(&self) -> Option<InboundText> {
        let message = self
            .entry
            .as_deref()?
            .first()?
            .changes
            .as_deref()?
            .first()?
            .value
            .as_ref()?
            .messages
            .as_deref()?
            .first()?;

        let from = message.from.as_ref()?;
        let body = message.text.as_ref()?.body.as_ref()?;

        Some(InboundText {
            from: from.clone(),
            body: body.clone(),
        })
    }
}

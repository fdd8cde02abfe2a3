//! WhatsApp Business Cloud API plumbing: inbound webhook envelopes,
//! signature checks, and outbound text messages.

pub mod client;
pub mod payload;
pub mod signature;

pub use client::{MessageSender, WhatsAppClient};
pub use payload::{InboundText, WebhookPayload};
pub use signature::verify_signature;

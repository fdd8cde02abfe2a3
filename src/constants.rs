/// Default SQLite database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/capture.db";

/// WhatsApp Cloud API base (Graph API version included)
pub const DEFAULT_WHATSAPP_API_BASE: &str = "https://graph.facebook.com/v21.0";

/// OpenAI-compatible chat completions base URL
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Model used for intent classification
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Header carrying the vendor's HMAC-SHA256 of the raw webhook body
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// The only `hub.mode` value accepted during the handshake
pub const SUBSCRIBE_MODE: &str = "subscribe";

// =============================================================================
// Replies
// =============================================================================

/// Sent to phone numbers that have no account
pub const SIGNUP_PROMPT: &str =
    "Hi! This number isn't linked to an account yet. Please sign up and add your phone number to start capturing notes, todos, bookmarks and reminders.";

/// Sent when the model picks a tool we cannot act on
pub const FALLBACK_REPLY: &str = "I'm not sure how to help with that.";

/// Body returned when the handshake token does not match
pub const ERR_VERIFICATION_FAILED: &str =
    "Failed validation. Make sure the validation tokens match.";

/// Generic body for unhandled errors
pub const ERR_INTERNAL: &str = "Internal Server Error";

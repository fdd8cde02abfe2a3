use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verify the `X-Hub-Signature-256` header of a webhook delivery
///
/// Meta signs the raw request body with the app secret and sends
/// `sha256=<hex digest>`. The comparison is constant time.
///
/// # Arguments
/// * `body` - The raw request body, exactly as received
/// * `header` - The header value, if present
/// * `app_secret` - The app secret from the Meta developer console
pub fn verify_signature(body: &[u8], header: Option<&str>, app_secret: &str) -> bool {
    let Some(header) = header else {
        tracing::warn!("Missing webhook signature header");
        return false;
    };

    let Some(hex_signature) = header.strip_prefix("sha256=") else {
        tracing::warn!("Webhook signature without sha256= prefix");
        return false;
    };

    let sig_bytes = match hex::decode(hex_signature) {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!("Invalid hex signature format");
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(app_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            tracing::error!("Failed to create HMAC instance");
            return false;
        }
    };
    mac.update(body);

    mac.verify_slice(&sig_bytes).is_ok()
}

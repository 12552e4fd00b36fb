//! Unguessable bearer tokens for booking management and playback links.

use base64::Engine;
use rand::RngCore;

/// Token length in random bytes (256 bits of entropy).
const TOKEN_BYTES: usize = 32;

/// Generate a cryptographically random, URL-safe opaque token.
///
/// The token is the sole credential for the appointment's self-service
/// manage endpoints (and, separately, for playback links), so it must be
/// unguessable and safe to embed in a URL.
#[must_use]
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let mut random_bytes = [0u8; TOKEN_BYTES];
    rng.fill_bytes(&mut random_bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_url_safe_and_distinct() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        // 32 bytes -> 43 base64 chars without padding
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}

//! Invite token generation.
//!
//! Invite tokens are opaque, URL-safe strings used as exact-match lookup keys.
//! They carry no structure and are never decoded.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes behind each token. 30 bytes encode to exactly
/// 40 base64url characters.
const TOKEN_RANDOM_BYTES: usize = 30;

/// Length of a generated invite token in characters.
pub const INVITE_TOKEN_LEN: usize = 40;

/// Generates a new invite token: 40 URL-safe characters from a 30-byte
/// CSPRNG source. Tokens are case-sensitive.
pub fn generate_invite_token() -> String {
    let mut bytes = [0u8; TOKEN_RANDOM_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Checks whether a string has the shape of an invite token
/// (correct length, URL-safe base64 alphabet).
///
/// This is a cheap pre-filter before the database lookup; it never replaces
/// the exact-match lookup itself.
pub fn is_invite_token_format(token: &str) -> bool {
    token.len() == INVITE_TOKEN_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_length() {
        let token = generate_invite_token();
        assert_eq!(token.len(), INVITE_TOKEN_LEN);
    }

    #[test]
    fn test_generated_token_is_url_safe() {
        let token = generate_invite_token();
        assert!(is_invite_token_format(&token));
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        let tokens: std::collections::HashSet<String> =
            (0..1000).map(|_| generate_invite_token()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_format_rejects_wrong_length() {
        assert!(!is_invite_token_format("short"));
        assert!(!is_invite_token_format(&"a".repeat(41)));
        assert!(!is_invite_token_format(""));
    }

    #[test]
    fn test_format_rejects_non_url_safe_chars() {
        let mut token = "a".repeat(39);
        token.push('+');
        assert!(!is_invite_token_format(&token));

        let mut token = "a".repeat(39);
        token.push('/');
        assert!(!is_invite_token_format(&token));

        let mut token = "a".repeat(39);
        token.push('=');
        assert!(!is_invite_token_format(&token));
    }

    #[test]
    fn test_format_accepts_full_alphabet() {
        let token = format!("{}-_A9", "a".repeat(36));
        assert_eq!(token.len(), 40);
        assert!(is_invite_token_format(&token));
    }
}

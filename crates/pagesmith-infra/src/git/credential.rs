//! Credential injection for git network commands.
//!
//! The token is handed to git as an `http.extraHeader` through the
//! `GIT_CONFIG_COUNT`/`GIT_CONFIG_KEY_n`/`GIT_CONFIG_VALUE_n` environment
//! variables. It never appears in argv, in the remote URL, or in the clone's
//! `.git/config`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};

/// Username GitHub expects alongside a token in basic auth.
const TOKEN_USER: &str = "x-access-token";

/// `Authorization` header value carrying `token`.
pub fn authorization_header(token: &SecretString) -> String {
    let pair = format!("{TOKEN_USER}:{}", token.expose_secret());
    format!("Authorization: Basic {}", STANDARD.encode(pair))
}

/// Environment variables that make git send the credential header.
pub fn auth_env(token: &SecretString) -> [(&'static str, String); 3] {
    [
        ("GIT_CONFIG_COUNT", "1".to_string()),
        ("GIT_CONFIG_KEY_0", "http.extraHeader".to_string()),
        ("GIT_CONFIG_VALUE_0", authorization_header(token)),
    ]
}

/// Replace any occurrence of the token (raw or encoded) in `text`.
pub fn redact(text: &str, token: &SecretString) -> String {
    let raw = token.expose_secret();
    if raw.is_empty() {
        return text.to_string();
    }
    let encoded = STANDARD.encode(format!("{TOKEN_USER}:{raw}"));
    text.replace(&encoded, "***").replace(raw, "***")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_is_basic_auth() {
        let token = SecretString::from("ghp_abc");
        let header = authorization_header(&token);
        let encoded = header.strip_prefix("Authorization: Basic ").unwrap();
        let decoded = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(decoded, "x-access-token:ghp_abc");
    }

    #[test]
    fn test_auth_env_shape() {
        let env = auth_env(&SecretString::from("t"));
        assert_eq!(env[0], ("GIT_CONFIG_COUNT", "1".to_string()));
        assert_eq!(env[1].1, "http.extraHeader");
        assert!(env[2].1.starts_with("Authorization: Basic "));
    }

    #[test]
    fn test_redact_hides_token() {
        let token = SecretString::from("sekret");
        let text = format!("fatal: https://sekret@host and {}", authorization_header(&token));
        let redacted = redact(&text, &token);
        assert!(!redacted.contains("sekret"));
        assert!(!redacted.contains(&STANDARD.encode("x-access-token:sekret")));
    }
}

//! JWT session gate.
//!
//! The gate is deliberately shallow: validity means "a token is present and
//! its `exp` claim is in the future". The signature is the server's problem
//! — the client only reads the payload segment to know when to force a
//! fresh login. A token whose payload cannot be read is treated as expired.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};

/// A retained login token plus its decoded expiry.
#[derive(Debug, Clone)]
pub struct SessionToken {
    raw: String,
    expires_at: Option<DateTime<Utc>>,
}

impl SessionToken {
    /// Decode the `exp` claim from a compact JWT.
    ///
    /// Never fails — an unreadable or claim-less token simply has no expiry
    /// and is reported invalid by [`is_valid`](Self::is_valid).
    #[must_use]
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let expires_at = decode_exp(&raw);
        Self { raw, expires_at }
    }

    /// The compact token, for the `x-opp-jwt` header.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// True while the token's expiry is in the future.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.expires_at.is_some_and(|exp| exp > Utc::now())
    }
}

fn decode_exp(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?.as_i64()?;
    DateTime::from_timestamp(exp, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token_with_exp(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"identity":1,"exp":{exp}}}"#));
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn future_exp_is_valid() {
        let exp = (Utc::now() + Duration::minutes(5)).timestamp();
        assert!(SessionToken::parse(token_with_exp(exp)).is_valid());
    }

    #[test]
    fn past_exp_is_invalid() {
        let exp = (Utc::now() - Duration::minutes(5)).timestamp();
        assert!(!SessionToken::parse(token_with_exp(exp)).is_valid());
    }

    #[test]
    fn garbage_token_is_invalid() {
        assert!(!SessionToken::parse("not-a-jwt").is_valid());
        assert!(!SessionToken::parse("a.b.c").is_valid());
    }

    #[test]
    fn missing_exp_claim_is_invalid() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"identity":1}"#);
        let token = format!("{header}.{payload}.sig");
        assert!(!SessionToken::parse(token).is_valid());
    }

    #[test]
    fn raw_round_trips() {
        let token = token_with_exp(0);
        assert_eq!(SessionToken::parse(token.clone()).raw(), token);
    }
}

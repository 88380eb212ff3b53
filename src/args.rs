//! Argument maps and canonical query construction (C1, §3, §4.1).
//!
//! The source treats an argument value as a union over
//! `{string, unsigned, signed, bool, double}`. [`ArgValue`] is the tagged
//! variant equivalent; [`ArgList`] is the insertion-ordered,
//! deduplicating-on-key container the REST pipeline canonicalises before
//! signing.

use std::fmt::Write as _;

/// A single scalar argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    UInt(u64),
    Int(i64),
    Bool(bool),
    Double(f64),
}

impl ArgValue {
    /// Serialise per §4.1: strings verbatim (no percent-encoding at this
    /// layer), integers in base 10, booleans as `true`/`false`, doubles via
    /// the default decimal formatting.
    fn encode(&self) -> String {
        match self {
            ArgValue::Str(s) => s.clone(),
            ArgValue::UInt(n) => n.to_string(),
            ArgValue::Int(n) => n.to_string(),
            ArgValue::Bool(b) => b.to_string(),
            ArgValue::Double(d) => d.to_string(),
        }
    }

    fn is_empty_string(&self) -> bool {
        matches!(self, ArgValue::Str(s) if s.is_empty())
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Str(s.to_owned())
    }
}
impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Str(s)
    }
}
impl From<u64> for ArgValue {
    fn from(n: u64) -> Self {
        ArgValue::UInt(n)
    }
}
impl From<i64> for ArgValue {
    fn from(n: i64) -> Self {
        ArgValue::Int(n)
    }
}
impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}
impl From<f64> for ArgValue {
    fn from(d: f64) -> Self {
        ArgValue::Double(d)
    }
}

/// An insertion-ordered, deduplicating-on-key argument list.
///
/// A key whose value is the empty string is omitted entirely: it never
/// appears in the canonical query and is never HMAC-signed (§4.1,
/// "argument omission" in §8). A pair whose key is the empty string
/// contributes a path segment rather than a query pair (§4.1 "path-vs-query
/// split") — callers extract those via [`ArgList::path_segments`] before
/// canonicalising the remainder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgList {
    pairs: Vec<(String, ArgValue)>,
}

impl ArgList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a key's value. Empty-string values are dropped
    /// silently, matching the source's `insert_kv`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        if value.is_empty_string() {
            return self;
        }
        if let Some(existing) = self.pairs.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = value;
        } else {
            self.pairs.push((key, value));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Path segments: every pair whose key is the empty string, in order of
    /// appearance, with the query pairs (non-empty keys) removed.
    pub fn path_segments(&self) -> impl Iterator<Item = &ArgValue> {
        self.pairs.iter().filter(|(k, _)| k.is_empty()).map(|(_, v)| v)
    }

    /// The non-path-segment pairs, in insertion order.
    pub fn query_pairs(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.pairs
            .iter()
            .filter(|(k, _)| !k.is_empty())
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Render `k1=v1&k2=v2&…` in insertion order, skipping path-segment
    /// pairs. This is the exact byte sequence HMAC-signed by §4.1.
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        for (i, (k, v)) in self.query_pairs().enumerate() {
            if i > 0 {
                out.push('&');
            }
            let _ = write!(out, "{k}={}", v.encode());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_preserves_insertion_order() {
        let mut args = ArgList::new();
        args.insert("symbol", "BTCUSDT").insert("timestamp", 1_700_000_000_000i64);
        assert_eq!(args.canonical(), "symbol=BTCUSDT&timestamp=1700000000000");
    }

    #[test]
    fn second_insert_overwrites_not_appends() {
        let mut args = ArgList::new();
        args.insert("symbol", "BTCUSDT");
        args.insert("symbol", "ETHUSDT");
        assert_eq!(args.len(), 1);
        assert_eq!(args.canonical(), "symbol=ETHUSDT");
    }

    #[test]
    fn empty_string_value_is_omitted() {
        let mut args = ArgList::new();
        args.insert("symbol", "BTCUSDT").insert("newClientOrderId", "");
        assert_eq!(args.canonical(), "symbol=BTCUSDT");
    }

    #[test]
    fn empty_key_is_a_path_segment_not_a_query_pair() {
        let mut args = ArgList::new();
        args.insert("", "1234567").insert("recvWindow", 5000u64);
        let segs: Vec<_> = args.path_segments().cloned().collect();
        assert_eq!(segs, vec![ArgValue::Str("1234567".into())]);
        assert_eq!(args.canonical(), "recvWindow=5000");
    }

    #[test]
    fn canonical_round_trips_through_insertion_order() {
        let mut args = ArgList::new();
        args.insert("b", "2").insert("a", "1").insert("c", "3");
        let first = args.canonical();
        let mut reparsed = ArgList::new();
        for pair in first.split('&') {
            let (k, v) = pair.split_once('=').unwrap();
            reparsed.insert(k.to_owned(), v.to_owned());
        }
        assert_eq!(reparsed.canonical(), first);
    }
}

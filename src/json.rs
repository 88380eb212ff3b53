//! JSON decoder facade (C2, §4.2).
//!
//! Binance serialises most numeric fields (price, quantity) as JSON strings
//! rather than JSON numbers. Response records declare their numeric fields
//! with [`str_or_num_f64`] / [`str_or_num_i64`] as the `deserialize_with`
//! coercion so that either wire representation is accepted (§4.2
//! "coercion rules"). Missing keys are handled by `#[serde(default)]` on the
//! field, which leaves it at its default rather than erroring — this is the
//! schema-tolerance policy of §7(c).
//!
//! The source's scratch-buffer, zero-copy-over-parser-memory design (§4.2,
//! §9 "buffer reuse") has no idiomatic analogue in a language with an
//! ownership model and a single-pass streaming parser API; per §9's own
//! guidance ("in a target language lacking such a notion, records should own
//! their strings"), response records here own their `String` fields and are
//! decoded via `serde_json` directly from the response body. There is
//! therefore no standalone "parser" type to reuse across documents — each
//! `serde_json::from_slice` call allocates its own values, which is the
//! idiomatic trade-off for safety over the source's manual buffer reuse.

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Deserialize a field that may arrive as either a JSON string or a JSON
/// number, coercing it to `f64`.
pub fn str_or_num_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a JSON string or number")
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<f64, E> {
            v.parse().map_err(E::custom)
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }
    }
    deserializer.deserialize_any(Visitor)
}

/// As [`str_or_num_f64`], but for `Option<f64>` fields that may also be
/// entirely absent (handled by `#[serde(default)]` on the field).
pub fn opt_str_or_num_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(str_or_num_f64(deserializer)?))
}

/// Deserialize a field that may arrive as either a JSON string or a JSON
/// number, coercing it to `i64`.
pub fn str_or_num_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a JSON string or number")
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<i64, E> {
            v.parse().map_err(E::custom)
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<i64, E> {
            Ok(v as i64)
        }
    }
    deserializer.deserialize_any(Visitor)
}

/// Deserialize a `(price, qty)` wire pair — Binance ships depth levels as a
/// two-element JSON array of numeric strings — into a typed [`PriceLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "(StrF64, StrF64)")]
pub struct PriceLevel {
    pub price: f64,
    pub qty: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(transparent)]
struct StrF64(#[serde(deserialize_with = "str_or_num_f64")] f64);

impl TryFrom<(StrF64, StrF64)> for PriceLevel {
    type Error = std::convert::Infallible;

    fn try_from((price, qty): (StrF64, StrF64)) -> Result<Self, Self::Error> {
        Ok(PriceLevel { price: price.0, qty: qty.0 })
    }
}

/// Deserialize a `Vec<PriceLevel>` from Binance's array-of-pairs wire shape.
/// Exists only so callers can name the coercion in a `deserialize_with`
/// attribute without repeating the element type.
pub fn price_levels<'de, D>(deserializer: D) -> Result<Vec<PriceLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<PriceLevel>::deserialize(deserializer)
}

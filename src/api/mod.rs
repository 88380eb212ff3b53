//! Typed endpoint facades over [`crate::client::RestClient`].
//!
//! Each sub-module adds high-level methods to [`crate::client::RestClient`],
//! mirroring the generic `get`/`post`/`put`/`delete` dispatch primitives
//! with one typed, one-liner method per endpoint (§6.1).

pub mod market;
pub mod trading;

// Listen-key lifecycle (§3, §4.3) lives directly on `RestClient` in
// `crate::client`, since it drives the client's own background renewal
// task rather than being a stateless one-liner over `get`/`post`.

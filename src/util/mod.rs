//! Helper types shared across the crate.
//!
//! - [`b64`] - Base64 framing for the wire credential

pub mod b64;

pub use b64::Base64Bytes;

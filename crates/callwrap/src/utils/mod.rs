//! Shared helpers
//!
//! - **[`serde`]**: duration codecs for deserializable settings

#[cfg(feature = "serde")]
pub mod serde;

#[cfg(feature = "serde")]
pub use self::serde::duration_millis;

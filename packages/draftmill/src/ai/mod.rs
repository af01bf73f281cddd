//! Provider adapters behind the `anthropic` feature.

#[cfg(feature = "anthropic")]
pub mod anthropic;

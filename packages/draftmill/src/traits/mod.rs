//! Core trait abstractions.
//!
//! Each external collaborator is a trait seam with an in-crate mock:
//!
//! - [`generator`] - Generative model calls ([`generator::TextModel`])
//! - [`media`] - Image search ([`media::MediaSearcher`])
//! - [`host`] - Publishing host ([`host::PublishHost`])

pub mod generator;
pub mod host;
pub mod media;

//! Domain data types.

pub mod article;
pub mod config;
pub mod document;
pub mod plan;
pub mod variation;

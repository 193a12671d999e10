//! HTTP API surface.

pub mod admin;
pub mod error;
pub mod extractors;

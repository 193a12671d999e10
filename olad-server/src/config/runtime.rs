//! Runtime configuration re-exports.
//!
//! The actual config types are defined in `olad_core::config`.
//! This module re-exports them for convenience.

pub use olad_core::config::{
    AdminConfig, PaginationConfig, PolicyConfig, ServerConfig, SharedConfig,
};

//! Validated runtime configuration shared across crates.
//!
//! Loading and parsing happen in the server crate; these are the in-memory
//! types the handlers read.

mod admin;
mod pagination;
mod policy;
mod server;

pub use admin::AdminConfig;
pub use pagination::PaginationConfig;
pub use policy::PolicyConfig;
pub use server::ServerConfig;

use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared configuration state with separate locks for each section.
///
/// Sections are updated independently during SIGHUP reload without blocking
/// readers of the other sections.
#[derive(Clone)]
pub struct SharedConfig {
    pub server: Arc<RwLock<ServerConfig>>,
    pub admin: Arc<RwLock<AdminConfig>>,
    pub pagination: Arc<RwLock<PaginationConfig>>,
    pub policy: Arc<RwLock<PolicyConfig>>,
}

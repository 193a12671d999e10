//! TOML file configuration structures.
//!
//! These structs directly map to the `olad-config.toml` file format.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub server: ServerConfig,
    pub admin: AdminConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

fn default_listen_addr() -> SocketAddr {
    "0.0.0.0:8080".parse().expect("valid default address")
}

/// Admin configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// The admin secret. If this is plaintext (doesn't start with `$argon2`),
    /// it will be hashed and the config file will be rewritten.
    pub secret: String,
}

/// Pagination clamping section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_limit")]
    pub default_limit: i64,
    #[serde(default = "default_max_limit")]
    pub max_limit: i64,
}

fn default_page_limit() -> i64 {
    20
}

fn default_max_limit() -> i64 {
    100
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_page_limit(),
            max_limit: default_max_limit(),
        }
    }
}

/// Behavioral policy section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Enforce the settlement status transition graph on PATCH.
    #[serde(default)]
    pub strict_settlement_transitions: bool,
}

impl FileConfig {
    /// Check if the admin secret is already hashed (argon2 format).
    pub fn is_admin_secret_hashed(&self) -> bool {
        self.admin.secret.starts_with("$argon2")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"

[admin]
secret = "test-secret"

[pagination]
default_limit = 25
max_limit = 200

[policy]
strict_settlement_transitions = true
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.pagination.default_limit, 25);
        assert_eq!(config.pagination.max_limit, 200);
        assert!(config.policy.strict_settlement_transitions);
        assert!(!config.is_admin_secret_hashed());
    }

    #[test]
    fn test_optional_sections_default() {
        let toml_str = r#"
[server]
listen = "0.0.0.0:8080"

[admin]
secret = "s"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.pagination.default_limit, 20);
        assert_eq!(config.pagination.max_limit, 100);
        assert!(!config.policy.strict_settlement_transitions);
    }

    #[test]
    fn test_hashed_secret_detection() {
        let config = FileConfig {
            server: ServerConfig {
                listen: default_listen_addr(),
            },
            admin: AdminConfig {
                secret: "$argon2id$v=19$m=19456,t=2,p=1$abc123".to_string(),
            },
            pagination: PaginationConfig::default(),
            policy: PolicyConfig::default(),
        };
        assert!(config.is_admin_secret_hashed());
    }
}

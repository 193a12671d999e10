//! Admin authentication configuration.

/// Admin secret in argon2 PHC form. The plaintext never lives here; the
/// server hashes it at load time if the file still carries plaintext.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    secret_hash: String,
}

impl AdminConfig {
    pub fn new(secret_hash: String) -> Self {
        Self { secret_hash }
    }

    pub fn secret_hash(&self) -> &str {
        &self.secret_hash
    }
}

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthError, AuthResult};

/// Access token with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    pub token_type: String,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl AccessToken {
    pub fn new(token: String, token_type: String) -> Self {
        Self {
            token,
            token_type,
            expires_at: None,
        }
    }

    /// Convenience constructor for the common bearer-token case
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::new(token.into(), "Bearer".to_string())
    }

    pub fn is_expired(&self) -> bool {
        if let Some(expires_at) = self.expires_at {
            chrono::Utc::now() > expires_at
        } else {
            false
        }
    }

    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.token)
    }
}

/// File-based token lookup under the configuration directory.
///
/// Tokens are stored base64-encoded in `<account>.access.token`, one file
/// per account. A missing file is a typed `TokenMissing` error so callers
/// cannot silently proceed unauthenticated.
pub struct TokenStore {
    config_dir: PathBuf,
}

impl TokenStore {
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        Self {
            config_dir: config_dir.as_ref().to_path_buf(),
        }
    }

    /// Load the access token for an account
    pub fn load(&self, account_id: &str) -> AuthResult<AccessToken> {
        let token_file = self.config_dir.join(format!("{}.access.token", account_id));

        if !token_file.exists() {
            tracing::error!("Access token not found for account {}", account_id);
            return Err(AuthError::TokenMissing);
        }

        let encoded_token = std::fs::read_to_string(&token_file)?;
        let decoded_token = general_purpose::STANDARD.decode(encoded_token.trim())?;
        let token = String::from_utf8(decoded_token)?;

        Ok(AccessToken::bearer(token))
    }

    /// Store an access token for an account
    pub fn store(&self, account_id: &str, token: &AccessToken) -> AuthResult<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        let token_file = self.config_dir.join(format!("{}.access.token", account_id));
        let encoded = general_purpose::STANDARD.encode(&token.token);
        std::fs::write(token_file, encoded)?;
        Ok(())
    }
}

pub mod token;

pub use token::{AccessToken, TokenStore};

use thiserror::Error;

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Access token not found")]
    TokenMissing,

    #[error("Failed to read token file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token file is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("Token file is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

pub type AuthResult<T> = Result<T, AuthError>;

//! Storage
//!
//! A small string key-value namespace shared by the cart, the session token and the user record.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Key holding the serialised cart.
pub const CART_KEY: &str = "cart";

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Key holding the signed-in user record.
pub const USER_KEY: &str = "user";

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key contains characters the backend cannot store.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// A stored value was not valid UTF-8.
    #[error("value for {0:?} is not valid UTF-8")]
    InvalidValue(String),

    /// The backend could not be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Filesystem error.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Asynchronous string key-value storage.
#[automock]
#[async_trait]
pub trait Storage: Send + Sync {
    /// Returns the value stored under `key`, or `None` when the key is absent.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Checks that a key is non-empty and only uses ASCII alphanumerics, `-` and `_`.
///
/// # Errors
///
/// Returns a [`StorageError::InvalidKey`] otherwise.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

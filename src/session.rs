//! Session
//!
//! Bearer token and user record kept in the shared storage namespace.

use std::{fmt, sync::Arc};

use tracing::{info, warn};

use crate::{
    cart::CartStore,
    storage::{Storage, StorageError, TOKEN_KEY, USER_KEY},
};

/// Signed-in state of the device.
pub struct Session {
    storage: Arc<dyn Storage>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a session over `storage`.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Returns the stored bearer token; unreadable storage reads as signed out.
    pub async fn token(&self) -> Option<String> {
        match self.storage.get_item(TOKEN_KEY).await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(error) => {
                warn!(%error, "failed to read token");
                None
            }
        }
    }

    /// Stores a bearer token.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the token could not be written.
    pub async fn set_token(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set_item(TOKEN_KEY, token).await
    }

    /// Returns the `Authorization` header value for backend calls, if signed in.
    pub async fn bearer_header(&self) -> Option<String> {
        self.token().await.map(|token| format!("Bearer {token}"))
    }

    /// Signs out: clears the cart, then drops the token and user record.
    ///
    /// The cart is cleared and both removals are attempted even when one of them fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`StorageError`] raised while removing the token or user record.
    pub async fn logout(&self, cart: &CartStore) -> Result<(), StorageError> {
        cart.clear().await;

        let token = self.storage.remove_item(TOKEN_KEY).await;
        let user = self.storage.remove_item(USER_KEY).await;

        token.and(user)?;

        info!("signed out");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        items::LineItem,
        products::ProductId,
        storage::{MemoryStorage, MockStorage},
    };

    use super::*;

    #[tokio::test]
    async fn bearer_header_uses_stored_token() -> TestResult {
        let session = Session::new(Arc::new(MemoryStorage::new()));

        assert_eq!(session.bearer_header().await, None);

        session.set_token("abc.def").await?;

        assert_eq!(session.bearer_header().await.as_deref(), Some("Bearer abc.def"));

        Ok(())
    }

    #[tokio::test]
    async fn unreadable_token_reads_as_signed_out() {
        let mut storage = MockStorage::new();
        storage
            .expect_get_item()
            .returning(|_| Err(StorageError::Unavailable("locked".to_string())));

        let session = Session::new(Arc::new(storage));

        assert_eq!(session.token().await, None);
    }

    #[tokio::test]
    async fn logout_clears_token_user_and_cart() -> TestResult {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(USER_KEY, r#"{"name":"Asha"}"#).await?;

        let session = Session::new(storage.clone());
        session.set_token("abc").await?;

        let cart = CartStore::open(storage.clone()).await;
        cart.add_item(LineItem::new(ProductId::from("a"), "A", Decimal::ONE))
            .await;

        session.logout(&cart).await?;

        assert_eq!(session.token().await, None);
        assert_eq!(storage.get_item(USER_KEY).await?, None);
        assert!(cart.snapshot().await.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_cart_when_token_removal_fails() -> TestResult {
        let mut storage = MockStorage::new();
        storage
            .expect_remove_item()
            .withf(|key| key == TOKEN_KEY)
            .times(1)
            .returning(|_| Err(StorageError::Unavailable("locked".to_string())));
        storage
            .expect_remove_item()
            .withf(|key| key == USER_KEY)
            .times(1)
            .returning(|_| Ok(()));

        let session = Session::new(Arc::new(storage));

        let cart = CartStore::open(Arc::new(MemoryStorage::new())).await;
        cart.add_item(LineItem::new(ProductId::from("a"), "A", Decimal::ONE))
            .await;

        let result = session.logout(&cart).await;

        assert!(matches!(result, Err(StorageError::Unavailable(_))));
        assert!(cart.snapshot().await.is_empty());

        Ok(())
    }
}

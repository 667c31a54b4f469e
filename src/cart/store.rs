//! Cart store
//!
//! Owner of the persisted cart. Every mutation re-reads the latest snapshot, applies the change
//! and persists the result while holding an async mutex, so callers sharing a store never lose
//! each other's updates and stores opened on the same namespace build on each other's writes.
//!
//! Persistence is best effort: storage failures are logged and the in-memory copy is used until
//! a readable snapshot is available again.

use std::{fmt, sync::Arc};

use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::{
    cart::{Cart, CartError},
    items::LineItem,
    storage::{CART_KEY, Storage},
};

/// Persistent cart backed by a [`Storage`] namespace.
pub struct CartStore {
    storage: Arc<dyn Storage>,
    cart: Mutex<Cart>,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore").finish_non_exhaustive()
    }
}

impl CartStore {
    /// Opens the store, loading whatever cart is persisted.
    pub async fn open(storage: Arc<dyn Storage>) -> Self {
        let cart = read_snapshot(storage.as_ref()).await;

        Self {
            storage,
            cart: Mutex::new(cart),
        }
    }

    /// Re-reads the persisted snapshot, replacing the in-memory copy.
    ///
    /// Missing, unreadable or malformed snapshots load as an empty cart.
    pub async fn load(&self) -> Cart {
        let mut guard = self.cart.lock().await;

        *guard = read_snapshot(self.storage.as_ref()).await;

        guard.clone()
    }

    /// Returns the current cart.
    pub async fn snapshot(&self) -> Cart {
        self.cart.lock().await.clone()
    }

    /// Merges `candidate` into the cart.
    #[instrument(skip_all, fields(product = %candidate.product_id(), quantity = candidate.quantity()))]
    pub async fn add_item(&self, candidate: LineItem) -> Cart {
        self.mutate(|cart| Ok(cart.with_item(candidate))).await
    }

    /// Replaces the quantity at `index`, clamped to at least one.
    #[instrument(skip(self))]
    pub async fn set_quantity(&self, index: usize, quantity: i64) -> Cart {
        self.mutate(|cart| cart.with_quantity(index, quantity))
            .await
    }

    /// Adds `delta` to the quantity at `index`, clamped to at least one.
    #[instrument(skip(self))]
    pub async fn adjust_quantity(&self, index: usize, delta: i64) -> Cart {
        self.mutate(|cart| cart.with_quantity_adjusted(index, delta))
            .await
    }

    /// Removes the row at `index`.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, index: usize) -> Cart {
        self.mutate(|cart| cart.without_item(index)).await
    }

    /// Replaces the whole cart with a single row.
    #[instrument(skip_all, fields(product = %item.product_id()))]
    pub async fn replace(&self, item: LineItem) -> Cart {
        self.mutate(|_| Ok(Cart::new().with_item(item))).await
    }

    /// Empties the cart.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Cart {
        self.mutate(|_| Ok(Cart::new())).await
    }

    /// Returns the total of the current cart.
    pub async fn total(&self) -> Decimal {
        self.cart.lock().await.total()
    }

    async fn mutate<F>(&self, f: F) -> Cart
    where
        F: FnOnce(&Cart) -> Result<Cart, CartError>,
    {
        let mut guard = self.cart.lock().await;

        if let Some(latest) = fetch_snapshot(self.storage.as_ref()).await {
            *guard = latest;
        }

        match f(&guard) {
            Ok(next) => {
                self.persist(&next).await;
                *guard = next;
            }
            Err(error) => warn!(%error, "ignoring cart mutation"),
        }

        guard.clone()
    }

    async fn persist(&self, cart: &Cart) {
        let json = match serde_json::to_string(cart) {
            Ok(json) => json,
            Err(error) => {
                warn!(%error, "failed to serialise cart");
                return;
            }
        };

        match self.storage.set_item(CART_KEY, &json).await {
            Ok(()) => debug!(items = cart.len(), "cart persisted"),
            Err(error) => warn!(%error, "failed to persist cart"),
        }
    }
}

async fn read_snapshot(storage: &dyn Storage) -> Cart {
    fetch_snapshot(storage).await.unwrap_or_default()
}

/// Returns the persisted cart, or `None` when nothing readable is stored.
async fn fetch_snapshot(storage: &dyn Storage) -> Option<Cart> {
    match storage.get_item(CART_KEY).await {
        Ok(Some(json)) => serde_json::from_str(&json)
            .inspect_err(|error| warn!(%error, "discarding malformed cart snapshot"))
            .ok(),
        Ok(None) => None,
        Err(error) => {
            warn!(%error, "failed to read cart snapshot");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        items::Variant,
        products::ProductId,
        storage::{MemoryStorage, MockStorage, StorageError},
    };

    use super::*;

    fn item(id: &str, price: i64, quantity: u32) -> LineItem {
        LineItem::new(ProductId::from(id), id, Decimal::from(price)).with_quantity(quantity)
    }

    async fn memory_store() -> (Arc<MemoryStorage>, CartStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = CartStore::open(storage.clone()).await;

        (storage, store)
    }

    #[tokio::test]
    async fn opens_empty_when_nothing_persisted() {
        let (_, store) = memory_store().await;

        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn add_item_persists_merged_cart() -> TestResult {
        let (storage, store) = memory_store().await;

        store.add_item(item("a", 10, 1)).await;
        let cart = store.add_item(item("a", 10, 2)).await;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), Decimal::from(30));

        let persisted = storage.get_item(CART_KEY).await?.ok_or("cart not persisted")?;
        let reloaded: Cart = serde_json::from_str(&persisted)?;
        assert_eq!(reloaded, cart);

        Ok(())
    }

    #[tokio::test]
    async fn load_reads_latest_snapshot() -> TestResult {
        let (storage, store) = memory_store().await;

        storage
            .set_item(
                CART_KEY,
                r#"[{"product_id":"x","name":"X","price":5,"quantity":2}]"#,
            )
            .await?;

        let cart = store.load().await;

        assert_eq!(cart.len(), 1);
        assert_eq!(store.total().await, Decimal::from(10));

        Ok(())
    }

    #[tokio::test]
    async fn malformed_snapshot_loads_empty() -> TestResult {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(CART_KEY, "{not json").await?;

        let store = CartStore::open(storage).await;

        assert!(store.snapshot().await.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn storage_read_failure_loads_empty() {
        let mut storage = MockStorage::new();
        storage
            .expect_get_item()
            .returning(|_| Err(StorageError::Unavailable("locked".to_string())));

        let store = CartStore::open(Arc::new(storage)).await;

        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn storage_write_failure_keeps_in_memory_cart() -> TestResult {
        let mut storage = MockStorage::new();
        storage.expect_get_item().returning(|_| Ok(None));
        storage
            .expect_set_item()
            .times(2)
            .returning(|_, _| Err(StorageError::Unavailable("disk full".to_string())));

        let store = CartStore::open(Arc::new(storage)).await;

        store.add_item(item("a", 10, 1)).await;
        let cart = store.add_item(item("a", 10, 1)).await;

        assert_eq!(cart.get_item(0)?.quantity(), 2);
        assert_eq!(store.snapshot().await, cart);

        Ok(())
    }

    #[tokio::test]
    async fn out_of_range_index_returns_cart_unchanged() {
        let mut storage = MockStorage::new();
        storage.expect_get_item().returning(|_| Ok(None));
        storage.expect_set_item().times(1).returning(|_, _| Ok(()));

        let store = CartStore::open(Arc::new(storage)).await;
        let before = store.add_item(item("a", 10, 1)).await;

        assert_eq!(store.set_quantity(5, 3).await, before);
        assert_eq!(store.adjust_quantity(5, 1).await, before);
        assert_eq!(store.remove_item(5).await, before);
    }

    #[tokio::test]
    async fn set_quantity_clamps_negative() -> TestResult {
        let (_, store) = memory_store().await;
        store.add_item(item("a", 10, 3)).await;

        let cart = store.set_quantity(0, -5).await;

        assert_eq!(cart.get_item(0)?.quantity(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn remove_then_clear() -> TestResult {
        let (storage, store) = memory_store().await;
        store.add_item(item("a", 1, 1)).await;
        store.add_item(item("b", 1, 1)).await;

        let cart = store.remove_item(0).await;
        assert_eq!(cart.len(), 1);

        let cart = store.clear().await;
        assert!(cart.is_empty());
        assert_eq!(storage.get_item(CART_KEY).await?.as_deref(), Some("[]"));

        let cart = store.clear().await;
        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn replace_leaves_single_row() -> TestResult {
        let (_, store) = memory_store().await;
        store.add_item(item("a", 1, 1)).await;
        store.add_item(item("b", 1, 1)).await;

        let buy_now = item("c", 20, 2).with_variant(Variant::new(Some("S"), None));
        let cart = store.replace(buy_now.clone()).await;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get_item(0)?, &buy_now);

        Ok(())
    }

    #[tokio::test]
    async fn stores_on_one_namespace_build_on_each_others_writes() -> TestResult {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let home = CartStore::open(Arc::clone(&storage)).await;
        let product_page = CartStore::open(Arc::clone(&storage)).await;

        home.add_item(item("x", 10, 1)).await;
        let cart = product_page.add_item(item("y", 20, 1)).await;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total(), Decimal::from(30));

        let cart = home.remove_item(1).await;
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get_item(0)?.product_id().as_str(), "x");

        let persisted: Cart =
            serde_json::from_str(&storage.get_item(CART_KEY).await?.ok_or("missing cart")?)?;
        assert_eq!(persisted, cart);

        Ok(())
    }

    #[tokio::test]
    async fn unreadable_storage_mutates_in_memory_copy() -> TestResult {
        let mut storage = MockStorage::new();
        storage.expect_get_item().times(1).returning(|_| Ok(None));
        storage
            .expect_get_item()
            .returning(|_| Err(StorageError::Unavailable("locked".to_string())));
        storage.expect_set_item().returning(|_, _| Ok(()));

        let store = CartStore::open(Arc::new(storage)).await;

        store.add_item(item("a", 10, 1)).await;
        let cart = store.add_item(item("a", 10, 1)).await;

        assert_eq!(cart.get_item(0)?.quantity(), 2);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_do_not_lose_updates() -> TestResult {
        let (storage, store) = memory_store().await;
        let store = Arc::new(store);

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.add_item(item("a", 2, 1)).await })
            })
            .collect();

        for handle in handles {
            handle.await?;
        }

        let cart = store.snapshot().await;
        assert_eq!(cart.get_item(0)?.quantity(), 32);

        let persisted: Cart =
            serde_json::from_str(&storage.get_item(CART_KEY).await?.ok_or("missing cart")?)?;
        assert_eq!(persisted, cart);

        Ok(())
    }
}

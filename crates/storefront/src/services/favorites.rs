//! Favorite toggling.

use std::future::Future;

use athletica_core::{ProductId, UserId};

use crate::db::{FavoriteRepository, RepositoryError};
use crate::models::LineSnapshot;

/// Storage for favorites.
pub trait FavoriteStore {
    fn contains(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    fn put(
        &self,
        user_id: UserId,
        line: &LineSnapshot,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn remove(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;
}

impl FavoriteStore for FavoriteRepository<'_> {
    async fn contains(&self, user_id: UserId, product_id: ProductId) -> Result<bool, RepositoryError> {
        FavoriteRepository::contains(self, user_id, product_id).await
    }

    async fn put(&self, user_id: UserId, line: &LineSnapshot) -> Result<(), RepositoryError> {
        FavoriteRepository::put(self, user_id, line).await
    }

    async fn remove(&self, user_id: UserId, product_id: ProductId) -> Result<bool, RepositoryError> {
        FavoriteRepository::remove(self, user_id, product_id).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

impl Toggled {
    /// Notification text for the toggle.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Added => "Added to favorites",
            Self::Removed => "Removed from favorites",
        }
    }
}

/// Flip a product's favorite state for a user.
///
/// `snapshot` is only needed when adding. Removing works for products that
/// have since been deleted from the catalog.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` when adding without a snapshot.
pub async fn toggle<S: FavoriteStore>(
    store: &S,
    user_id: UserId,
    product_id: ProductId,
    snapshot: Option<&LineSnapshot>,
) -> Result<Toggled, RepositoryError> {
    if store.contains(user_id, product_id).await? {
        store.remove(user_id, product_id).await?;
        return Ok(Toggled::Removed);
    }

    let line = snapshot.ok_or(RepositoryError::NotFound)?;
    store.put(user_id, line).await?;
    Ok(Toggled::Added)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use athletica_core::Price;

    use super::*;

    #[derive(Default)]
    struct MemoryFavorites(Mutex<HashSet<(UserId, ProductId)>>);

    impl FavoriteStore for MemoryFavorites {
        async fn contains(
            &self,
            user_id: UserId,
            product_id: ProductId,
        ) -> Result<bool, RepositoryError> {
            Ok(self.0.lock().unwrap().contains(&(user_id, product_id)))
        }

        async fn put(&self, user_id: UserId, line: &LineSnapshot) -> Result<(), RepositoryError> {
            self.0.lock().unwrap().insert((user_id, line.product_id));
            Ok(())
        }

        async fn remove(
            &self,
            user_id: UserId,
            product_id: ProductId,
        ) -> Result<bool, RepositoryError> {
            Ok(self.0.lock().unwrap().remove(&(user_id, product_id)))
        }
    }

    const USER: UserId = UserId::new(5);
    const PRODUCT: ProductId = ProductId::new(42);

    fn snapshot() -> LineSnapshot {
        LineSnapshot {
            product_id: PRODUCT,
            name: "Yoga Mat Pro".to_owned(),
            price: Price::from_cents(3900),
            image_url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_double_toggle_restores_state() {
        let store = MemoryFavorites::default();
        let line = snapshot();

        assert_eq!(
            toggle(&store, USER, PRODUCT, Some(&line)).await.unwrap(),
            Toggled::Added
        );
        assert!(store.contains(USER, PRODUCT).await.unwrap());

        assert_eq!(
            toggle(&store, USER, PRODUCT, Some(&line)).await.unwrap(),
            Toggled::Removed
        );
        assert!(!store.contains(USER, PRODUCT).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_without_snapshot() {
        let store = MemoryFavorites::default();
        store.put(USER, &snapshot()).await.unwrap();

        assert_eq!(
            toggle(&store, USER, PRODUCT, None).await.unwrap(),
            Toggled::Removed
        );
    }

    #[tokio::test]
    async fn test_add_requires_snapshot() {
        let store = MemoryFavorites::default();
        let err = toggle(&store, USER, PRODUCT, None).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_favorites_are_per_user() {
        let store = MemoryFavorites::default();
        toggle(&store, USER, PRODUCT, Some(&snapshot())).await.unwrap();
        assert!(!store.contains(UserId::new(6), PRODUCT).await.unwrap());
    }
}

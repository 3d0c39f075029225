//! Cart quantity logic and totals.

use std::future::Future;

use athletica_core::{Price, ProductId, Quantity, UserId};

use crate::db::{CartRepository, RepositoryError};
use crate::models::CartItem;

/// Storage for cart lines.
pub trait CartStore {
    fn line(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Option<CartItem>, RepositoryError>> + Send;

    fn save_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

impl CartStore for CartRepository<'_> {
    async fn line(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<CartItem>, RepositoryError> {
        self.get(user_id, product_id).await
    }

    async fn save_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<(), RepositoryError> {
        self.set_quantity(user_id, product_id, quantity).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustOutcome {
    /// The new quantity was written.
    Updated(Quantity),
    /// Decrement at one; nothing was written.
    Unchanged,
}

/// Apply a +1/-1 step to a cart line.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the line is not in the cart.
pub async fn adjust_quantity<S: CartStore>(
    store: &S,
    user_id: UserId,
    product_id: ProductId,
    adjustment: Adjustment,
) -> Result<AdjustOutcome, RepositoryError> {
    let line = store
        .line(user_id, product_id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    let next = match adjustment {
        Adjustment::Increment => Some(line.quantity.increment()),
        Adjustment::Decrement => line.quantity.decrement(),
    };

    let Some(quantity) = next else {
        return Ok(AdjustOutcome::Unchanged);
    };

    store.save_quantity(user_id, product_id, quantity).await?;
    Ok(AdjustOutcome::Updated(quantity))
}

/// A cart with its order total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub lines: Vec<CartItem>,
    pub total: Price,
    pub item_count: i64,
}

impl CartSummary {
    #[must_use]
    pub fn new(lines: Vec<CartItem>) -> Self {
        let total = lines.iter().map(CartItem::line_total).sum();
        let item_count = lines.iter().map(|l| i64::from(l.quantity.get())).sum();
        Self {
            lines,
            total,
            item_count,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;

    #[derive(Default)]
    struct MemoryCart {
        lines: Mutex<HashMap<(UserId, ProductId), CartItem>>,
        writes: Mutex<usize>,
    }

    impl MemoryCart {
        fn with_line(user: UserId, product: ProductId, price: Price) -> Self {
            let cart = Self::default();
            cart.lines.lock().unwrap().insert(
                (user, product),
                CartItem {
                    product_id: product,
                    name: "Tempo Tee".to_owned(),
                    price,
                    image_url: String::new(),
                    quantity: Quantity::ONE,
                    added_at: Utc::now(),
                },
            );
            cart
        }

        fn quantity(&self, user: UserId, product: ProductId) -> Quantity {
            self.lines.lock().unwrap()[&(user, product)].quantity
        }

        fn writes(&self) -> usize {
            *self.writes.lock().unwrap()
        }
    }

    impl CartStore for MemoryCart {
        async fn line(
            &self,
            user_id: UserId,
            product_id: ProductId,
        ) -> Result<Option<CartItem>, RepositoryError> {
            Ok(self.lines.lock().unwrap().get(&(user_id, product_id)).cloned())
        }

        async fn save_quantity(
            &self,
            user_id: UserId,
            product_id: ProductId,
            quantity: Quantity,
        ) -> Result<(), RepositoryError> {
            *self.writes.lock().unwrap() += 1;
            let mut lines = self.lines.lock().unwrap();
            let line = lines
                .get_mut(&(user_id, product_id))
                .ok_or(RepositoryError::NotFound)?;
            line.quantity = quantity;
            Ok(())
        }
    }

    const USER: UserId = UserId::new(1);
    const PRODUCT: ProductId = ProductId::new(10);

    #[tokio::test]
    async fn test_decrement_at_one_writes_nothing() {
        let cart = MemoryCart::with_line(USER, PRODUCT, Price::from_cents(999));

        let outcome = adjust_quantity(&cart, USER, PRODUCT, Adjustment::Decrement)
            .await
            .unwrap();

        assert_eq!(outcome, AdjustOutcome::Unchanged);
        assert_eq!(cart.quantity(USER, PRODUCT), Quantity::ONE);
        assert_eq!(cart.writes(), 0);
    }

    #[tokio::test]
    async fn test_quantity_never_drops_below_one() {
        let cart = MemoryCart::with_line(USER, PRODUCT, Price::from_cents(999));

        for _ in 0..3 {
            adjust_quantity(&cart, USER, PRODUCT, Adjustment::Increment)
                .await
                .unwrap();
        }
        for _ in 0..6 {
            adjust_quantity(&cart, USER, PRODUCT, Adjustment::Decrement)
                .await
                .unwrap();
        }

        assert_eq!(cart.quantity(USER, PRODUCT), Quantity::ONE);
        assert_eq!(cart.writes(), 6);
    }

    #[tokio::test]
    async fn test_increment_updates_line_total() {
        let price = Price::parse("49.99").unwrap();
        let cart = MemoryCart::with_line(USER, PRODUCT, price);

        let outcome = adjust_quantity(&cart, USER, PRODUCT, Adjustment::Increment)
            .await
            .unwrap();
        assert_eq!(outcome, AdjustOutcome::Updated(Quantity::new(2).unwrap()));

        let line = cart.line(USER, PRODUCT).await.unwrap().unwrap();
        assert_eq!(line.line_total().to_string(), "$99.98");
    }

    #[tokio::test]
    async fn test_missing_line_is_not_found() {
        let cart = MemoryCart::default();
        let err = adjust_quantity(&cart, USER, PRODUCT, Adjustment::Increment)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[test]
    fn test_summary_totals() {
        let line = |id: i32, cents: u32, qty: i32| CartItem {
            product_id: ProductId::new(id),
            name: format!("Item {id}"),
            price: Price::from_cents(cents),
            image_url: String::new(),
            quantity: Quantity::new(qty).unwrap(),
            added_at: Utc::now(),
        };

        let summary = CartSummary::new(vec![line(1, 4999, 2), line(2, 1500, 1)]);
        assert_eq!(summary.total.to_string(), "$114.98");
        assert_eq!(summary.item_count, 3);
        assert!(!summary.is_empty());
        assert!(CartSummary::new(Vec::new()).is_empty());
    }
}

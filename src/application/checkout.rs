use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::cart::CartStore;
use crate::domain::checkout::{calculate_total, generate_order_number, CheckoutForm};
use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, OrderItemInput, OrderPlacement};
use crate::domain::ports::{OrderRepository, ProductRepository, UserDirectory};

/// The authenticated identity as handed over by the session layer. Session
/// management itself is an external collaborator; this core only consumes
/// the resolved email.
#[derive(Debug, Clone)]
pub struct Principal {
    pub email: String,
}

/// Converts cart + form state into a persisted order with items.
///
/// The write is a single database transaction behind
/// [`OrderRepository::create_with_items`], so a failure leaves no partial
/// order behind and the cart untouched for retry.
pub struct CheckoutService<O, U, P> {
    orders: O,
    users: U,
    products: P,
}

impl<O, U, P> CheckoutService<O, U, P>
where
    O: OrderRepository,
    U: UserDirectory,
    P: ProductRepository,
{
    pub fn new(orders: O, users: U, products: P) -> Self {
        Self {
            orders,
            users,
            products,
        }
    }

    /// Place an order from the current cart and checkout form.
    ///
    /// `idempotency_key` identifies this checkout attempt; resubmitting the
    /// same key (e.g. a double-click racing the first request) returns the
    /// already-created order instead of inserting a duplicate.
    ///
    /// The cart is cleared only after the order is persisted; on any error it
    /// is left exactly as it was.
    pub fn place_order(
        &self,
        principal: Option<&Principal>,
        cart: &mut CartStore,
        form: &CheckoutForm,
        idempotency_key: Uuid,
    ) -> Result<OrderPlacement, DomainError> {
        let principal = principal.ok_or(DomainError::AuthRequired)?;

        let user_id = self
            .users
            .resolve_user_id(&principal.email)?
            .ok_or(DomainError::UserResolutionFailed)?;

        if cart.is_empty() {
            return Err(DomainError::InvalidInput("cart is empty".to_string()));
        }

        let items = self.snapshot_items(cart)?;

        let subtotal = cart.total_price();
        let total_amount = calculate_total(&subtotal, form.tip.amount());

        let order = NewOrder {
            order_number: generate_order_number(),
            user_id,
            total_amount,
            shipping_address: form.shipping.clone(),
            billing_address: form.billing_address(),
            idempotency_key,
        };

        let placement = self.orders.create_with_items(order, items)?;

        cart.clear();
        Ok(placement)
    }

    /// Snapshot each cart line into an order item. Name and price are taken
    /// from the cart (what the customer saw), the SKU from the catalog row.
    fn snapshot_items(&self, cart: &CartStore) -> Result<Vec<OrderItemInput>, DomainError> {
        cart.lines()
            .iter()
            .map(|line| {
                let product = self.products.find_by_id(line.product_id)?.ok_or_else(|| {
                    DomainError::InvalidInput(format!(
                        "product {} is no longer available",
                        line.product_id
                    ))
                })?;

                Ok(OrderItemInput {
                    product_id: line.product_id,
                    product_name: line.title.clone(),
                    sku: product.sku,
                    price: line.price.clone(),
                    quantity: line.quantity,
                })
            })
            .collect()
    }

    /// Quote the order total without writing anything: Σ(price × quantity)
    /// over the cart plus flat shipping plus the selected tip.
    pub fn quote_total(&self, cart: &CartStore, form: &CheckoutForm) -> BigDecimal {
        calculate_total(&cart.total_price(), form.tip.amount())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use crate::domain::cart::CartLine;
    use crate::domain::checkout::{Address, TipState};
    use crate::domain::order::{OrderStatus, OrderView, PaymentStatus, ProductView};

    // ── In-memory fakes ──────────────────────────────────────────────────

    struct FakeUsers {
        by_email: HashMap<String, i64>,
    }

    impl UserDirectory for FakeUsers {
        fn resolve_user_id(&self, email: &str) -> Result<Option<i64>, DomainError> {
            Ok(self.by_email.get(email).copied())
        }
    }

    struct FakeProducts {
        by_id: HashMap<i64, ProductView>,
    }

    impl ProductRepository for FakeProducts {
        fn find_by_id(&self, id: i64) -> Result<Option<ProductView>, DomainError> {
            Ok(self.by_id.get(&id).cloned())
        }

        fn list_by_category(&self, _: &str) -> Result<Vec<ProductView>, DomainError> {
            Ok(vec![])
        }

        fn list_by_seller(&self, _: i64) -> Result<Vec<ProductView>, DomainError> {
            Ok(vec![])
        }

        fn list_deals(&self, _: i64) -> Result<Vec<ProductView>, DomainError> {
            Ok(vec![])
        }
    }

    struct FakeOrders {
        created: Mutex<Vec<(NewOrder, Vec<OrderItemInput>)>>,
        fail_writes: bool,
    }

    impl OrderRepository for FakeOrders {
        fn create_with_items(
            &self,
            order: NewOrder,
            items: Vec<OrderItemInput>,
        ) -> Result<OrderPlacement, DomainError> {
            if self.fail_writes {
                // Atomic: nothing is recorded on failure.
                return Err(DomainError::WriteFailed("connection reset".to_string()));
            }

            let mut created = self.created.lock().unwrap();
            if let Some((i, existing)) = created
                .iter()
                .enumerate()
                .find(|(_, (o, _))| o.idempotency_key == order.idempotency_key)
                .map(|(i, pair)| (i, &pair.0))
            {
                return Ok(OrderPlacement {
                    order_id: i as i64 + 1,
                    order_number: existing.order_number.clone(),
                    total_amount: existing.total_amount.clone(),
                    deduplicated: true,
                });
            }

            let placement = OrderPlacement {
                order_id: created.len() as i64 + 1,
                order_number: order.order_number.clone(),
                total_amount: order.total_amount.clone(),
                deduplicated: false,
            };
            created.push((order, items));
            Ok(placement)
        }

        fn find_by_id(&self, _: i64) -> Result<Option<OrderView>, DomainError> {
            Ok(None)
        }

        fn list_for_user(&self, _: i64) -> Result<Vec<OrderView>, DomainError> {
            Ok(vec![])
        }

        fn update_status(
            &self,
            _: i64,
            _: Option<OrderStatus>,
            _: Option<PaymentStatus>,
        ) -> Result<(), DomainError> {
            Ok(())
        }
    }

    // ── Fixtures ─────────────────────────────────────────────────────────

    fn product(id: i64, sku: &str) -> ProductView {
        ProductView {
            id,
            seller_id: 1,
            name: format!("Product {}", id),
            sku: sku.to_string(),
            category: None,
            price: BigDecimal::from(1000),
            image_url: String::new(),
            created_at: Utc::now(),
        }
    }

    fn cart_line(product_id: i64, price: i64, quantity: u32) -> CartLine {
        CartLine {
            product_id,
            title: format!("Product {}", product_id),
            price: BigDecimal::from(price),
            image: String::new(),
            quantity,
        }
    }

    fn address() -> Address {
        Address {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            address: "1 Harbor Dr".into(),
            city: "Arlington".into(),
            postal_code: "22202".into(),
            country: "US".into(),
            phone: "+1 555 0100".into(),
        }
    }

    fn form() -> CheckoutForm {
        CheckoutForm {
            shipping: address(),
            use_different_billing: false,
            billing: None,
            tip: TipState::none(),
        }
    }

    fn service(fail_writes: bool) -> CheckoutService<FakeOrders, FakeUsers, FakeProducts> {
        CheckoutService::new(
            FakeOrders {
                created: Mutex::new(vec![]),
                fail_writes,
            },
            FakeUsers {
                by_email: HashMap::from([("grace@example.com".to_string(), 42)]),
            },
            FakeProducts {
                by_id: HashMap::from([(1, product(1, "SKU-1")), (2, product(2, "SKU-2"))]),
            },
        )
    }

    fn filled_cart() -> CartStore {
        let mut cart = CartStore::new();
        cart.add_item(cart_line(1, 1000, 2));
        cart.add_item(cart_line(2, 500, 1));
        cart
    }

    fn principal() -> Principal {
        Principal {
            email: "grace@example.com".to_string(),
        }
    }

    // ── Tests ────────────────────────────────────────────────────────────

    #[test]
    fn no_principal_fails_before_any_write() {
        let svc = service(false);
        let mut cart = filled_cart();

        let err = svc
            .place_order(None, &mut cart, &form(), Uuid::new_v4())
            .unwrap_err();

        assert!(matches!(err, DomainError::AuthRequired));
        assert!(svc.orders.created.lock().unwrap().is_empty());
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn unknown_email_is_user_resolution_failure() {
        let svc = service(false);
        let mut cart = filled_cart();
        let p = Principal {
            email: "nobody@example.com".to_string(),
        };

        let err = svc
            .place_order(Some(&p), &mut cart, &form(), Uuid::new_v4())
            .unwrap_err();

        assert!(matches!(err, DomainError::UserResolutionFailed));
        assert!(svc.orders.created.lock().unwrap().is_empty());
    }

    #[test]
    fn empty_cart_is_rejected() {
        let svc = service(false);
        let mut cart = CartStore::new();

        let err = svc
            .place_order(Some(&principal()), &mut cart, &form(), Uuid::new_v4())
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn successful_checkout_persists_and_clears_the_cart() {
        let svc = service(false);
        let mut cart = filled_cart();

        let placement = svc
            .place_order(Some(&principal()), &mut cart, &form(), Uuid::new_v4())
            .expect("checkout failed");

        assert!(!placement.deduplicated);
        // subtotal 2500 + shipping 250 + tip 0
        assert_eq!(placement.total_amount, BigDecimal::from(2750));
        assert!(cart.is_empty());

        let created = svc.orders.created.lock().unwrap();
        let (order, items) = &created[0];
        assert_eq!(order.user_id, 42);
        assert_eq!(order.billing_address, order.shipping_address);
        assert!(order.order_number.starts_with("ORD-"));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].sku, "SKU-1");
        assert_eq!(items[0].total_price(), BigDecimal::from(2000));
    }

    #[test]
    fn tip_percentage_is_included_in_the_total() {
        let svc = service(false);
        let mut cart = filled_cart();
        let mut form = form();
        form.tip.select_percent(15, &cart.total_price());

        let placement = svc
            .place_order(Some(&principal()), &mut cart, &form, Uuid::new_v4())
            .expect("checkout failed");

        // 2500 + 250 + 375
        assert_eq!(placement.total_amount, BigDecimal::from(3125));
    }

    #[test]
    fn failed_write_preserves_the_cart_and_is_retryable() {
        let svc = service(true);
        let mut cart = filled_cart();

        let err = svc
            .place_order(Some(&principal()), &mut cart, &form(), Uuid::new_v4())
            .unwrap_err();

        assert!(matches!(err, DomainError::WriteFailed(_)));
        // The transaction rolled back: no order, no items, cart intact.
        assert!(svc.orders.created.lock().unwrap().is_empty());
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total_price(), BigDecimal::from(2500));
    }

    #[test]
    fn resubmitting_the_same_attempt_key_returns_the_original_order() {
        let svc = service(false);
        let key = Uuid::new_v4();

        let mut cart = filled_cart();
        let first = svc
            .place_order(Some(&principal()), &mut cart, &form(), key)
            .expect("first checkout failed");

        // Double-submit: the client retries with the same attempt key.
        let mut cart = filled_cart();
        let second = svc
            .place_order(Some(&principal()), &mut cart, &form(), key)
            .expect("second checkout failed");

        assert!(second.deduplicated);
        assert_eq!(second.order_id, first.order_id);
        assert_eq!(second.order_number, first.order_number);
        assert_eq!(svc.orders.created.lock().unwrap().len(), 1);
    }

    #[test]
    fn vanished_product_rejects_the_checkout() {
        let svc = service(false);
        let mut cart = CartStore::new();
        cart.add_item(cart_line(99, 1000, 1));

        let err = svc
            .place_order(Some(&principal()), &mut cart, &form(), Uuid::new_v4())
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn quote_total_matches_subtotal_plus_shipping_plus_tip() {
        let svc = service(false);
        let cart = filled_cart();
        let mut form = form();

        assert_eq!(svc.quote_total(&cart, &form), BigDecimal::from(2750));

        form.tip.enter_manual(BigDecimal::from(100));
        assert_eq!(svc.quote_total(&cart, &form), BigDecimal::from(2850));
    }
}

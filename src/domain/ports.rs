use super::analytics::SaleRecord;
use super::errors::DomainError;
use super::order::{
    NewOrder, NewSeller, OrderItemInput, OrderPlacement, OrderStatus, OrderView, PaymentStatus,
    ProductView, SellerUpdate, SellerView,
};

/// Read-only access to the product catalog.
pub trait ProductRepository: Send + Sync + 'static {
    fn find_by_id(&self, id: i64) -> Result<Option<ProductView>, DomainError>;
    fn list_by_category(&self, category: &str) -> Result<Vec<ProductView>, DomainError>;
    fn list_by_seller(&self, seller_id: i64) -> Result<Vec<ProductView>, DomainError>;
    /// "Deals" listing: cheapest first.
    fn list_deals(&self, limit: i64) -> Result<Vec<ProductView>, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Persist the order header and all of its items atomically. A repeated
    /// `idempotency_key` must return the previously created order instead of
    /// inserting a duplicate.
    fn create_with_items(
        &self,
        order: NewOrder,
        items: Vec<OrderItemInput>,
    ) -> Result<OrderPlacement, DomainError>;

    fn find_by_id(&self, id: i64) -> Result<Option<OrderView>, DomainError>;
    fn list_for_user(&self, user_id: i64) -> Result<Vec<OrderView>, DomainError>;

    /// Seller-side status mutation; `None` fields are left unchanged.
    fn update_status(
        &self,
        id: i64,
        order_status: Option<OrderStatus>,
        payment_status: Option<PaymentStatus>,
    ) -> Result<(), DomainError>;
}

/// Resolves the authenticated principal's email to the numeric application
/// user id. A missing row means the auth identity and the user table have
/// drifted apart.
pub trait UserDirectory: Send + Sync + 'static {
    fn resolve_user_id(&self, email: &str) -> Result<Option<i64>, DomainError>;
}

pub trait SalesRepository: Send + Sync + 'static {
    fn list_for_seller(&self, seller_id: i64) -> Result<Vec<SaleRecord>, DomainError>;
}

pub trait SellerRepository: Send + Sync + 'static {
    fn register(&self, seller: NewSeller) -> Result<SellerView, DomainError>;
    fn find_by_id(&self, id: i64) -> Result<Option<SellerView>, DomainError>;
    fn update(&self, id: i64, update: SellerUpdate) -> Result<SellerView, DomainError>;
}

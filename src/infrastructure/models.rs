use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::analytics::SaleRecord;
use crate::domain::checkout::Address;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    OrderItemView, OrderStatus, OrderView, PaymentStatus, ProductView, SellerView,
};
use crate::schema::{order_items, orders, products, sales, sellers, users};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = sellers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SellerRow {
    pub id: i64,
    pub user_id: i64,
    pub store_name: String,
    pub contact_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SellerRow> for SellerView {
    fn from(row: SellerRow) -> Self {
        SellerView {
            id: row.id,
            user_id: row.user_id,
            store_name: row.store_name,
            contact_email: row.contact_email,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sellers)]
pub struct NewSellerRow {
    pub user_id: i64,
    pub store_name: String,
    pub contact_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i64,
    pub seller_id: i64,
    pub name: String,
    pub sku: String,
    pub category: Option<String>,
    pub price: BigDecimal,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl ProductRow {
    /// Validate the row into a domain view. Catalog rows with a negative
    /// price are rejected rather than propagated into cart arithmetic.
    pub fn into_view(self) -> Result<ProductView, DomainError> {
        if self.price < BigDecimal::from(0) {
            return Err(DomainError::InvalidInput(format!(
                "product {} has a negative price",
                self.id
            )));
        }
        Ok(ProductView {
            id: self.id,
            seller_id: self.seller_id,
            name: self.name,
            sku: self.sku,
            category: self.category,
            price: self.price,
            image_url: self.image_url,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub seller_id: i64,
    pub name: String,
    pub sku: String,
    pub category: Option<String>,
    pub price: BigDecimal,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i64,
    pub order_number: String,
    pub user_id: i64,
    pub total_amount: BigDecimal,
    pub shipping_address: Value,
    pub billing_address: Value,
    pub order_status: String,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub idempotency_key: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    /// Validate the row plus its item rows into a domain view.
    pub fn into_view(self, items: Vec<OrderItemRow>) -> Result<OrderView, DomainError> {
        let order_status: OrderStatus = self.order_status.parse()?;
        let payment_status: PaymentStatus = self.payment_status.parse()?;
        let shipping_address: Address = serde_json::from_value(self.shipping_address)
            .map_err(|e| DomainError::InvalidInput(format!("malformed shipping address: {}", e)))?;
        let billing_address: Address = serde_json::from_value(self.billing_address)
            .map_err(|e| DomainError::InvalidInput(format!("malformed billing address: {}", e)))?;

        let items = items
            .into_iter()
            .map(OrderItemRow::into_view)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OrderView {
            id: self.id,
            order_number: self.order_number,
            user_id: self.user_id,
            total_amount: self.total_amount,
            shipping_address,
            billing_address,
            order_status,
            payment_status,
            payment_method: self.payment_method,
            created_at: self.created_at,
            items,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub order_number: String,
    pub user_id: i64,
    pub total_amount: BigDecimal,
    pub shipping_address: Value,
    pub billing_address: Value,
    pub order_status: String,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub idempotency_key: Uuid,
}

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations,
)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub sku: String,
    pub price: BigDecimal,
    pub quantity: i32,
    pub total_price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

impl OrderItemRow {
    pub fn into_view(self) -> Result<OrderItemView, DomainError> {
        if self.quantity < 1 {
            return Err(DomainError::InvalidInput(format!(
                "order item {} has a non-positive quantity",
                self.id
            )));
        }
        let quantity = self.quantity as u32;
        Ok(OrderItemView {
            id: self.id,
            product_id: self.product_id,
            product_name: self.product_name,
            sku: self.sku,
            price: self.price,
            quantity,
            total_price: self.total_price,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub sku: String,
    pub price: BigDecimal,
    pub quantity: i32,
    pub total_price: BigDecimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = sales)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SaleRow {
    pub id: i64,
    pub seller_id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub sale_amount: BigDecimal,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

impl SaleRow {
    /// Validate the row into an aggregation record; rows with a non-positive
    /// quantity are rejected instead of skewing the dashboards.
    pub fn into_record(self) -> Result<SaleRecord, DomainError> {
        if self.quantity < 1 {
            return Err(DomainError::InvalidInput(format!(
                "sale {} has a non-positive quantity",
                self.id
            )));
        }
        let quantity = self.quantity as u32;
        Ok(SaleRecord {
            order_id: self.order_id,
            product_id: self.product_id,
            product_name: self.product_name,
            sale_amount: self.sale_amount,
            quantity,
            created_at: self.created_at,
        })
    }
}

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::checkout::Address;
use super::errors::DomainError;

/// Fulfilment status of an order. Mutated by seller-side actions after the
/// order is placed; checkout always creates orders as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(DomainError::InvalidInput(format!(
                "unknown order status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            "refunded" => Ok(Self::Refunded),
            other => Err(DomainError::InvalidInput(format!(
                "unknown payment status '{}'",
                other
            ))),
        }
    }
}

/// Order header to persist. Checkout fixes the statuses: `pending`, `unpaid`,
/// `payment_method = "pending"`.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub user_id: i64,
    pub total_amount: BigDecimal,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub idempotency_key: Uuid,
}

/// One order line to persist, product name/sku/price snapshotted at purchase
/// time so later catalog edits do not alter historical orders.
#[derive(Debug, Clone)]
pub struct OrderItemInput {
    pub product_id: i64,
    pub product_name: String,
    pub sku: String,
    pub price: BigDecimal,
    pub quantity: u32,
}

impl OrderItemInput {
    pub fn total_price(&self) -> BigDecimal {
        &self.price * BigDecimal::from(self.quantity)
    }
}

/// Result of a create-order call. `deduplicated` is true when the idempotency
/// key matched an earlier submission and that order was returned instead.
#[derive(Debug, Clone)]
pub struct OrderPlacement {
    pub order_id: i64,
    pub order_number: String,
    pub total_amount: BigDecimal,
    pub deduplicated: bool,
}

#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub sku: String,
    pub price: BigDecimal,
    pub quantity: u32,
    pub total_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: i64,
    pub order_number: String,
    pub user_id: i64,
    pub total_amount: BigDecimal,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
}

#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: i64,
    pub seller_id: i64,
    pub name: String,
    pub sku: String,
    pub category: Option<String>,
    pub price: BigDecimal,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SellerView {
    pub id: i64,
    pub user_id: i64,
    pub store_name: String,
    pub contact_email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSeller {
    pub user_id: i64,
    pub store_name: String,
    pub contact_email: String,
}

/// Partial update for a seller profile; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct SellerUpdate {
    pub store_name: Option<String>,
    pub contact_email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn order_status_round_trips_through_strings() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::from_str(status.as_str()).ok(), Some(status));
        }
    }

    #[test]
    fn unknown_status_is_invalid_input() {
        assert!(matches!(
            OrderStatus::from_str("teleported"),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            PaymentStatus::from_str("iou"),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn item_total_is_price_times_quantity() {
        let item = OrderItemInput {
            product_id: 1,
            product_name: "Mug".into(),
            sku: "MUG-1".into(),
            price: BigDecimal::from(500),
            quantity: 3,
        };
        assert_eq!(item.total_price(), BigDecimal::from(1500));
    }
}

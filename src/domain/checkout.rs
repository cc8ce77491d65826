use bigdecimal::rounding::RoundingMode;
use bigdecimal::BigDecimal;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flat shipping fee applied to every order, in currency units.
pub const SHIPPING_COST: i64 = 250;

pub fn shipping_cost() -> BigDecimal {
    BigDecimal::from(SHIPPING_COST)
}

/// Shipping or billing address as captured from the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
}

/// Tip selection. A percentage pick and a manually typed amount are mutually
/// exclusive: picking a percentage overwrites the amount with the computed
/// value, typing an amount clears the percentage indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipState {
    percent: Option<u32>,
    amount: BigDecimal,
}

impl Default for TipState {
    fn default() -> Self {
        Self {
            percent: None,
            amount: BigDecimal::from(0),
        }
    }
}

impl TipState {
    pub fn none() -> Self {
        Self::default()
    }

    /// Select a percentage tip; the amount becomes `round₂(subtotal × p/100)`.
    pub fn select_percent(&mut self, percent: u32, subtotal: &BigDecimal) {
        self.percent = Some(percent);
        self.amount = (subtotal * BigDecimal::from(percent) / BigDecimal::from(100))
            .with_scale_round(2, RoundingMode::HalfUp);
    }

    /// Enter a manual tip amount; resets the percentage selector to none.
    pub fn enter_manual(&mut self, amount: BigDecimal) {
        self.percent = None;
        self.amount = amount;
    }

    pub fn percent(&self) -> Option<u32> {
        self.percent
    }

    pub fn amount(&self) -> &BigDecimal {
        &self.amount
    }
}

/// Checkout form state: shipping fields, the optional separate billing block,
/// and the tip selection.
#[derive(Debug, Clone)]
pub struct CheckoutForm {
    pub shipping: Address,
    /// When false, the billing block mirrors shipping exactly at submission.
    pub use_different_billing: bool,
    pub billing: Option<Address>,
    pub tip: TipState,
}

impl CheckoutForm {
    /// Billing address as submitted: a copy of shipping unless the caller
    /// opted into a separate billing block. An identical copy is accepted
    /// even with the flag set; the flag only switches which fields are read.
    pub fn billing_address(&self) -> Address {
        if self.use_different_billing {
            self.billing.clone().unwrap_or_else(|| self.shipping.clone())
        } else {
            self.shipping.clone()
        }
    }
}

/// `subtotal + shipping + tip`, exactly, with no intermediate rounding.
pub fn calculate_total(subtotal: &BigDecimal, tip: &BigDecimal) -> BigDecimal {
    subtotal + shipping_cost() + tip
}

/// Generate a timestamp-derived order number, e.g. `ORD-1756500000000-3fa2c1`.
///
/// Uniqueness is not reserved up front; the random suffix makes collisions
/// statistically negligible and the database's unique constraint catches the
/// rest as a retryable write failure.
pub fn generate_order_number() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("ORD-{}-{}", millis, &suffix[..6])
}

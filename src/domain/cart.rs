use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// One product entry in the shopping cart.
///
/// Invariants: `quantity >= 1`, and no two lines in a [`CartStore`] share a
/// `product_id` (adding an existing id merges quantities instead).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: i64,
    pub title: String,
    pub price: BigDecimal,
    pub image: String,
    pub quantity: u32,
}

/// The defined action set for cart mutations, for reducer-style callers.
#[derive(Debug, Clone)]
pub enum CartAction {
    Add(CartLine),
    Remove { product_id: i64 },
    SetQuantity { product_id: i64, quantity: u32 },
    Clear,
}

/// In-progress cart state. Owned by the caller (one instance per session or
/// per test), not a process-wide singleton.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    lines: Vec<CartLine>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line. If a line with the same product id exists its quantity is
    /// incremented by the incoming quantity; otherwise the line is appended
    /// with `quantity = max(1, incoming)`. Always succeeds.
    pub fn add_item(&mut self, line: CartLine) {
        match self.lines.iter_mut().find(|l| l.product_id == line.product_id) {
            Some(existing) => existing.quantity += line.quantity.max(1),
            None => {
                let quantity = line.quantity.max(1);
                self.lines.push(CartLine { quantity, ..line });
            }
        }
    }

    /// Delete the line with `product_id`; no-op if absent.
    pub fn remove_item(&mut self, product_id: i64) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Set a line's quantity to `max(1, quantity)`. Clamps rather than
    /// removing on zero input; no-op if the id is absent.
    pub fn update_quantity(&mut self, product_id: i64, quantity: u32) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity.max(1);
        }
    }

    /// Σ(price × quantity) over all lines, recomputed on every call so it
    /// reflects the latest mutation synchronously.
    pub fn total_price(&self) -> BigDecimal {
        self.lines
            .iter()
            .map(|l| &l.price * BigDecimal::from(l.quantity))
            .sum()
    }

    /// Total number of units across all lines (cart-badge counter).
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Empty the cart. Called exactly once, after an order is persisted.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Dispatch one [`CartAction`].
    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::Add(line) => self.add_item(line),
            CartAction::Remove { product_id } => self.remove_item(product_id),
            CartAction::SetQuantity {
                product_id,
                quantity,
            } => self.update_quantity(product_id, quantity),
            CartAction::Clear => self.clear(),
        }
    }
}

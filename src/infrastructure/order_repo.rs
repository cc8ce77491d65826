use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    NewOrder, OrderItemInput, OrderPlacement, OrderStatus, OrderView, PaymentStatus,
};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_items, orders};

use super::fetch_failed;
use super::models::{NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow};

/// Payment method recorded at checkout; actual payment capture happens in a
/// later, external step.
const PAYMENT_METHOD_AT_CHECKOUT: &str = "pending";

#[derive(AsChangeset)]
#[diesel(table_name = orders)]
struct OrderStatusChangeset {
    order_status: Option<String>,
    payment_status: Option<String>,
    updated_at: DateTime<Utc>,
}

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn load_view(
        &self,
        conn: &mut PgConnection,
        row: OrderRow,
    ) -> Result<OrderView, DomainError> {
        let items = order_items::table
            .filter(order_items::order_id.eq(row.id))
            .order(order_items::id.asc())
            .select(OrderItemRow::as_select())
            .load(conn)
            .map_err(fetch_failed)?;
        row.into_view(items)
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create_with_items(
        &self,
        order: NewOrder,
        items: Vec<OrderItemInput>,
    ) -> Result<OrderPlacement, DomainError> {
        let mut conn = self.pool.get()?;

        let shipping_address = serde_json::to_value(&order.shipping_address)
            .map_err(|e| DomainError::InvalidInput(format!("shipping address: {}", e)))?;
        let billing_address = serde_json::to_value(&order.billing_address)
            .map_err(|e| DomainError::InvalidInput(format!("billing address: {}", e)))?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // Insert the header. A replayed idempotency key hits the unique
            // constraint and inserts nothing.
            let inserted: Option<(i64, String, BigDecimal)> = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    order_number: order.order_number.clone(),
                    user_id: order.user_id,
                    total_amount: order.total_amount.clone(),
                    shipping_address,
                    billing_address,
                    order_status: OrderStatus::Pending.as_str().to_string(),
                    payment_status: PaymentStatus::Unpaid.as_str().to_string(),
                    payment_method: Some(PAYMENT_METHOD_AT_CHECKOUT.to_string()),
                    idempotency_key: order.idempotency_key,
                })
                .on_conflict(orders::idempotency_key)
                .do_nothing()
                .returning((orders::id, orders::order_number, orders::total_amount))
                .get_result(conn)
                .optional()?;

            let Some((order_id, order_number, total_amount)) = inserted else {
                // Double submit: hand back the order the first attempt made.
                let (order_id, order_number, total_amount) = orders::table
                    .filter(orders::idempotency_key.eq(order.idempotency_key))
                    .select((orders::id, orders::order_number, orders::total_amount))
                    .first(conn)?;
                return Ok(OrderPlacement {
                    order_id,
                    order_number,
                    total_amount,
                    deduplicated: true,
                });
            };

            // Item inserts share the transaction; any rejection rolls the
            // header back too.
            let rows: Vec<NewOrderItemRow> = items
                .iter()
                .map(|item| NewOrderItemRow {
                    order_id,
                    product_id: item.product_id,
                    product_name: item.product_name.clone(),
                    sku: item.sku.clone(),
                    price: item.price.clone(),
                    quantity: item.quantity as i32,
                    total_price: item.total_price(),
                })
                .collect();
            diesel::insert_into(order_items::table)
                .values(&rows)
                .execute(conn)?;

            Ok(OrderPlacement {
                order_id,
                order_number,
                total_amount,
                deduplicated: false,
            })
        })
    }

    fn find_by_id(&self, id: i64) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(fetch_failed)?;

        match row {
            Some(row) => Ok(Some(self.load_view(&mut conn, row)?)),
            None => Ok(None),
        }
    }

    /// Order headers only, newest first; items are loaded on by-id reads.
    fn list_for_user(&self, user_id: i64) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::user_id.eq(user_id))
            .order(orders::created_at.desc())
            .select(OrderRow::as_select())
            .load(&mut conn)
            .map_err(fetch_failed)?;

        rows.into_iter().map(|row| row.into_view(vec![])).collect()
    }

    fn update_status(
        &self,
        id: i64,
        order_status: Option<OrderStatus>,
        payment_status: Option<PaymentStatus>,
    ) -> Result<(), DomainError> {
        if order_status.is_none() && payment_status.is_none() {
            return Err(DomainError::InvalidInput(
                "no status fields to update".to_string(),
            ));
        }

        let mut conn = self.pool.get()?;
        let updated = diesel::update(orders::table.filter(orders::id.eq(id)))
            .set(&OrderStatusChangeset {
                order_status: order_status.map(|s| s.as_str().to_string()),
                payment_status: payment_status.map(|s| s.as_str().to_string()),
                updated_at: Utc::now(),
            })
            .execute(&mut conn)?;

        if updated == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }
}

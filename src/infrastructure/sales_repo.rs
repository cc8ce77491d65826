use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::analytics::SaleRecord;
use crate::domain::errors::DomainError;
use crate::domain::ports::SalesRepository;
use crate::schema::sales;

use super::fetch_failed;
use super::models::SaleRow;

pub struct DieselSalesRepository {
    pool: DbPool,
}

impl DieselSalesRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl SalesRepository for DieselSalesRepository {
    /// Full raw row set for one seller, oldest first. The aggregators are
    /// pure over whatever this returns.
    fn list_for_seller(&self, seller_id: i64) -> Result<Vec<SaleRecord>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = sales::table
            .filter(sales::seller_id.eq(seller_id))
            .order(sales::created_at.asc())
            .select(SaleRow::as_select())
            .load(&mut conn)
            .map_err(fetch_failed)?;

        rows.into_iter().map(SaleRow::into_record).collect()
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use chrono::{TimeZone, Utc};

    use super::DieselSalesRepository;
    use crate::domain::analytics;
    use crate::domain::ports::SalesRepository;
    use crate::infrastructure::testutil::{new_order, order_item, seed_sale, seed_storefront, setup_db};
    use crate::infrastructure::order_repo::DieselOrderRepository;
    use crate::domain::ports::OrderRepository;
    use uuid::Uuid;

    #[tokio::test]
    async fn lists_only_the_given_sellers_rows() {
        let (_container, pool) = setup_db().await;
        let seed = seed_storefront(&pool);

        let orders = DieselOrderRepository::new(pool.clone());
        let placement = orders
            .create_with_items(
                new_order(seed.user_id, 2750, Uuid::new_v4()),
                vec![order_item(seed.product_id, "MUG-1", 1000, 2)],
            )
            .expect("create failed");

        let jan = Utc.with_ymd_and_hms(2025, 1, 5, 9, 0, 0).single().unwrap();
        let feb = Utc.with_ymd_and_hms(2025, 2, 7, 9, 0, 0).single().unwrap();
        seed_sale(&pool, seed.seller_id, placement.order_id, seed.product_id, "Ceramic Mug", 1000, 1, jan);
        seed_sale(&pool, seed.seller_id, placement.order_id, seed.product_id, "Ceramic Mug", 2000, 2, feb);

        let repo = DieselSalesRepository::new(pool);

        let rows = repo.list_for_seller(seed.seller_id).expect("list failed");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sale_amount, BigDecimal::from(1000));

        assert!(repo.list_for_seller(seed.seller_id + 1).expect("list failed").is_empty());

        // The fetched rows feed straight into the aggregators.
        let monthly = analytics::monthly_revenue(&rows);
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].label, "January 2025");
        assert_eq!(monthly[1].revenue, BigDecimal::from(2000));
    }
}

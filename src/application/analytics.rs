use crate::domain::analytics::{
    self, CategoryRevenue, DailyOrders, MonthlyRevenue, ProductTotals,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::SalesRepository;

/// Fetches a seller's raw sale rows and runs the pure aggregations over
/// them. Every call refetches and recomputes; the series always match the
/// raw data as of the fetch.
pub struct AnalyticsService<S> {
    sales: S,
}

impl<S: SalesRepository> AnalyticsService<S> {
    pub fn new(sales: S) -> Self {
        Self { sales }
    }

    pub fn monthly_revenue(&self, seller_id: i64) -> Result<Vec<MonthlyRevenue>, DomainError> {
        let rows = self.sales.list_for_seller(seller_id)?;
        Ok(analytics::monthly_revenue(&rows))
    }

    pub fn category_breakdown(&self, seller_id: i64) -> Result<Vec<CategoryRevenue>, DomainError> {
        let rows = self.sales.list_for_seller(seller_id)?;
        Ok(analytics::category_breakdown(&rows))
    }

    pub fn orders_timeline(&self, seller_id: i64) -> Result<Vec<DailyOrders>, DomainError> {
        let rows = self.sales.list_for_seller(seller_id)?;
        let summaries = analytics::order_summaries(&rows);
        Ok(analytics::orders_timeline(&summaries))
    }

    pub fn top_products(&self, seller_id: i64) -> Result<Vec<ProductTotals>, DomainError> {
        let rows = self.sales.list_for_seller(seller_id)?;
        Ok(analytics::top_products(&rows))
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::analytics::SaleRecord;

    struct FixedSales(Vec<SaleRecord>);

    impl SalesRepository for FixedSales {
        fn list_for_seller(&self, _: i64) -> Result<Vec<SaleRecord>, DomainError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSales;

    impl SalesRepository for BrokenSales {
        fn list_for_seller(&self, _: i64) -> Result<Vec<SaleRecord>, DomainError> {
            Err(DomainError::FetchFailed("timeout".to_string()))
        }
    }

    fn sale(order_id: i64, amount: i64, month: u32) -> SaleRecord {
        SaleRecord {
            order_id,
            product_id: order_id,
            product_name: "Ceramic Mug".to_string(),
            sale_amount: BigDecimal::from(amount),
            quantity: 1,
            created_at: Utc
                .with_ymd_and_hms(2025, month, 3, 8, 0, 0)
                .single()
                .expect("valid date"),
        }
    }

    #[test]
    fn timeline_runs_over_per_order_summaries() {
        let svc = AnalyticsService::new(FixedSales(vec![
            sale(1, 100, 1),
            sale(1, 50, 1),
            sale(2, 200, 2),
        ]));

        let timeline = svc.orders_timeline(7).expect("timeline failed");

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].orders, 1);
        assert_eq!(timeline[0].revenue, BigDecimal::from(150));
    }

    #[test]
    fn fetch_failure_propagates_as_fetch_failed() {
        let svc = AnalyticsService::new(BrokenSales);

        assert!(matches!(
            svc.monthly_revenue(7),
            Err(DomainError::FetchFailed(_))
        ));
    }
}

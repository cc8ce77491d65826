//! Pure aggregation of raw sale/order rows into chart-ready series.
//!
//! Every function here recomputes from the full row set it is given; there is
//! no incremental state, so rerunning an aggregation over the same rows
//! always yields the same output.

use std::collections::BTreeMap;
use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

/// One raw sale row as fetched for a seller dashboard.
#[derive(Debug, Clone)]
pub struct SaleRecord {
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub sale_amount: BigDecimal,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
}

/// Order header plus its total item quantity, input to the daily timeline.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    pub created_at: DateTime<Utc>,
    pub total_amount: BigDecimal,
    pub item_quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub revenue: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyOrders {
    pub date: NaiveDate,
    pub orders: u64,
    pub revenue: BigDecimal,
    pub items: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductTotals {
    pub product_id: i64,
    pub product_name: String,
    pub total_amount: BigDecimal,
    pub total_quantity: u64,
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Revenue per (year, month), sorted chronologically regardless of the order
/// the rows arrive in.
pub fn monthly_revenue(sales: &[SaleRecord]) -> Vec<MonthlyRevenue> {
    let mut buckets: BTreeMap<(i32, u32), BigDecimal> = BTreeMap::new();
    for sale in sales {
        let key = (sale.created_at.year(), sale.created_at.month());
        *buckets.entry(key).or_insert_with(|| BigDecimal::from(0)) += &sale.sale_amount;
    }

    buckets
        .into_iter()
        .map(|((year, month), revenue)| MonthlyRevenue {
            year,
            month,
            label: format!("{} {}", MONTH_NAMES[(month - 1) as usize], year),
            revenue,
        })
        .collect()
}

/// Revenue per category, first-seen order.
///
/// The category is the first whitespace-separated word of the product name.
/// TODO: group by the `products.category` column instead once sale rows carry
/// it; the name prefix is a stand-in from the original dashboard.
pub fn category_breakdown(sales: &[SaleRecord]) -> Vec<CategoryRevenue> {
    let mut out: Vec<CategoryRevenue> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for sale in sales {
        let category = sale
            .product_name
            .split_whitespace()
            .next()
            .unwrap_or("Uncategorized")
            .to_string();

        match index.get(&category) {
            Some(&i) => out[i].revenue += &sale.sale_amount,
            None => {
                index.insert(category.clone(), out.len());
                out.push(CategoryRevenue {
                    category,
                    revenue: sale.sale_amount.clone(),
                });
            }
        }
    }

    out
}

/// Collapse sale rows into one summary per order: revenue and item quantity
/// summed across the order's rows, timestamped by the first row seen.
/// Feeds [`orders_timeline`] for a seller's slice of the order book.
pub fn order_summaries(sales: &[SaleRecord]) -> Vec<OrderSummary> {
    let mut out: Vec<OrderSummary> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for sale in sales {
        match index.get(&sale.order_id) {
            Some(&i) => {
                out[i].total_amount += &sale.sale_amount;
                out[i].item_quantity += sale.quantity;
            }
            None => {
                index.insert(sale.order_id, out.len());
                out.push(OrderSummary {
                    created_at: sale.created_at,
                    total_amount: sale.sale_amount.clone(),
                    item_quantity: sale.quantity,
                });
            }
        }
    }

    out
}

/// Order count, revenue, and item quantity per calendar day, ascending.
pub fn orders_timeline(orders: &[OrderSummary]) -> Vec<DailyOrders> {
    let mut buckets: BTreeMap<NaiveDate, (u64, BigDecimal, u64)> = BTreeMap::new();
    for order in orders {
        let day = order.created_at.date_naive();
        let entry = buckets
            .entry(day)
            .or_insert_with(|| (0, BigDecimal::from(0), 0));
        entry.0 += 1;
        entry.1 += &order.total_amount;
        entry.2 += u64::from(order.item_quantity);
    }

    buckets
        .into_iter()
        .map(|(date, (orders, revenue, items))| DailyOrders {
            date,
            orders,
            revenue,
            items,
        })
        .collect()
}

/// Sale amount and quantity per product id, first-seen order. Equal totals
/// keep their arrival order; there is no secondary tie-break.
pub fn top_products(sales: &[SaleRecord]) -> Vec<ProductTotals> {
    let mut out: Vec<ProductTotals> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for sale in sales {
        match index.get(&sale.product_id) {
            Some(&i) => {
                out[i].total_amount += &sale.sale_amount;
                out[i].total_quantity += u64::from(sale.quantity);
            }
            None => {
                index.insert(sale.product_id, out.len());
                out.push(ProductTotals {
                    product_id: sale.product_id,
                    product_name: sale.product_name.clone(),
                    total_amount: sale.sale_amount.clone(),
                    total_quantity: u64::from(sale.quantity),
                });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sale(product_id: i64, name: &str, amount: i64, quantity: u32, date: (i32, u32, u32)) -> SaleRecord {
        SaleRecord {
            order_id: product_id,
            product_id,
            product_name: name.to_string(),
            sale_amount: BigDecimal::from(amount),
            quantity,
            created_at: Utc
                .with_ymd_and_hms(date.0, date.1, date.2, 12, 0, 0)
                .single()
                .expect("valid date"),
        }
    }

    #[test]
    fn monthly_revenue_sums_per_month_and_sorts_chronologically() {
        // Deliberately out of order: March, January, February, March again.
        let sales = vec![
            sale(1, "Mug", 300, 1, (2025, 3, 10)),
            sale(2, "Mug", 100, 1, (2025, 1, 5)),
            sale(3, "Mug", 200, 1, (2025, 2, 20)),
            sale(4, "Mug", 50, 1, (2025, 3, 1)),
        ];

        let buckets = monthly_revenue(&sales);

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].label, "January 2025");
        assert_eq!(buckets[0].revenue, BigDecimal::from(100));
        assert_eq!(buckets[1].label, "February 2025");
        assert_eq!(buckets[1].revenue, BigDecimal::from(200));
        assert_eq!(buckets[2].label, "March 2025");
        assert_eq!(buckets[2].revenue, BigDecimal::from(350));
    }

    #[test]
    fn monthly_revenue_keeps_same_month_of_different_years_apart() {
        let sales = vec![
            sale(1, "Mug", 100, 1, (2024, 6, 1)),
            sale(2, "Mug", 200, 1, (2025, 6, 1)),
        ];

        let buckets = monthly_revenue(&sales);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label, "June 2024");
        assert_eq!(buckets[1].label, "June 2025");
    }

    #[test]
    fn category_breakdown_groups_by_first_word_of_name() {
        let sales = vec![
            sale(1, "Ceramic Mug", 100, 1, (2025, 1, 1)),
            sale(2, "Ceramic Bowl", 200, 1, (2025, 1, 2)),
            sale(3, "Steel Flask", 50, 1, (2025, 1, 3)),
        ];

        let groups = category_breakdown(&sales);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "Ceramic");
        assert_eq!(groups[0].revenue, BigDecimal::from(300));
        assert_eq!(groups[1].category, "Steel");
        assert_eq!(groups[1].revenue, BigDecimal::from(50));
    }

    #[test]
    fn category_breakdown_is_idempotent_over_the_same_rows() {
        let sales = vec![
            sale(1, "Ceramic Mug", 100, 1, (2025, 1, 1)),
            sale(2, "Steel Flask", 50, 2, (2025, 1, 3)),
            sale(3, "Ceramic Bowl", 200, 1, (2025, 1, 2)),
        ];

        assert_eq!(category_breakdown(&sales), category_breakdown(&sales));
    }

    #[test]
    fn orders_timeline_buckets_per_day() {
        let day = |d| {
            Utc.with_ymd_and_hms(2025, 5, d, 9, 30, 0)
                .single()
                .expect("valid date")
        };
        let orders = vec![
            OrderSummary {
                created_at: day(2),
                total_amount: BigDecimal::from(500),
                item_quantity: 3,
            },
            OrderSummary {
                created_at: day(1),
                total_amount: BigDecimal::from(1000),
                item_quantity: 2,
            },
            OrderSummary {
                created_at: day(2),
                total_amount: BigDecimal::from(250),
                item_quantity: 1,
            },
        ];

        let timeline = orders_timeline(&orders);

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].orders, 1);
        assert_eq!(timeline[0].revenue, BigDecimal::from(1000));
        assert_eq!(timeline[1].orders, 2);
        assert_eq!(timeline[1].revenue, BigDecimal::from(750));
        assert_eq!(timeline[1].items, 4);
        assert!(timeline[0].date < timeline[1].date);
    }

    #[test]
    fn top_products_accumulates_and_keeps_arrival_order() {
        let sales = vec![
            sale(7, "Ceramic Mug", 100, 1, (2025, 1, 1)),
            sale(9, "Steel Flask", 100, 2, (2025, 1, 2)),
            sale(7, "Ceramic Mug", 300, 3, (2025, 1, 3)),
        ];

        let totals = top_products(&sales);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].product_id, 7);
        assert_eq!(totals[0].total_amount, BigDecimal::from(400));
        assert_eq!(totals[0].total_quantity, 4);
        // Product 9 arrived second and stays second even with equal totals.
        assert_eq!(totals[1].product_id, 9);
    }

    #[test]
    fn order_summaries_collapse_rows_per_order() {
        let mut a = sale(1, "Ceramic Mug", 100, 2, (2025, 1, 1));
        let mut b = sale(2, "Steel Flask", 50, 1, (2025, 1, 1));
        let mut c = sale(3, "Ceramic Bowl", 75, 3, (2025, 1, 2));
        a.order_id = 10;
        b.order_id = 10;
        c.order_id = 11;

        let summaries = order_summaries(&[a, b, c]);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].total_amount, BigDecimal::from(150));
        assert_eq!(summaries[0].item_quantity, 3);
        assert_eq!(summaries[1].total_amount, BigDecimal::from(75));
    }

    #[test]
    fn aggregations_over_empty_input_are_empty() {
        assert!(monthly_revenue(&[]).is_empty());
        assert!(category_breakdown(&[]).is_empty());
        assert!(orders_timeline(&[]).is_empty());
        assert!(top_products(&[]).is_empty());
    }
}

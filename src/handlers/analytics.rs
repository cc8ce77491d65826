use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::analytics::AnalyticsService;
use crate::db::DbPool;
use crate::domain::analytics::{CategoryRevenue, DailyOrders, MonthlyRevenue, ProductTotals};
use crate::errors::AppError;
use crate::infrastructure::sales_repo::DieselSalesRepository;

#[derive(Debug, Serialize, ToSchema)]
pub struct MonthlyRevenueResponse {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub revenue: String,
}

impl From<MonthlyRevenue> for MonthlyRevenueResponse {
    fn from(b: MonthlyRevenue) -> Self {
        MonthlyRevenueResponse {
            year: b.year,
            month: b.month,
            label: b.label,
            revenue: b.revenue.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryRevenueResponse {
    pub category: String,
    pub revenue: String,
}

impl From<CategoryRevenue> for CategoryRevenueResponse {
    fn from(b: CategoryRevenue) -> Self {
        CategoryRevenueResponse {
            category: b.category,
            revenue: b.revenue.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyOrdersResponse {
    pub date: String,
    pub orders: u64,
    pub revenue: String,
    pub items: u64,
}

impl From<DailyOrders> for DailyOrdersResponse {
    fn from(b: DailyOrders) -> Self {
        DailyOrdersResponse {
            date: b.date.to_string(),
            orders: b.orders,
            revenue: b.revenue.to_string(),
            items: b.items,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductTotalsResponse {
    pub product_id: i64,
    pub product_name: String,
    pub total_amount: String,
    pub total_quantity: u64,
}

impl From<ProductTotals> for ProductTotalsResponse {
    fn from(b: ProductTotals) -> Self {
        ProductTotalsResponse {
            product_id: b.product_id,
            product_name: b.product_name,
            total_amount: b.total_amount.to_string(),
            total_quantity: b.total_quantity,
        }
    }
}

fn service(pool: &web::Data<DbPool>) -> AnalyticsService<DieselSalesRepository> {
    AnalyticsService::new(DieselSalesRepository::new(pool.get_ref().clone()))
}

/// GET /sellers/{id}/analytics/monthly — revenue per month, chronological.
#[utoipa::path(
    get,
    path = "/sellers/{id}/analytics/monthly",
    params(("id" = i64, Path, description = "Seller id")),
    responses((status = 200, description = "Monthly revenue series", body = [MonthlyRevenueResponse])),
    tag = "analytics"
)]
pub async fn monthly_revenue(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let seller_id = path.into_inner();

    let series = web::block(move || service(&pool).monthly_revenue(seller_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<MonthlyRevenueResponse> =
        series.into_iter().map(MonthlyRevenueResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /sellers/{id}/analytics/categories — revenue per category.
#[utoipa::path(
    get,
    path = "/sellers/{id}/analytics/categories",
    params(("id" = i64, Path, description = "Seller id")),
    responses((status = 200, description = "Category revenue breakdown", body = [CategoryRevenueResponse])),
    tag = "analytics"
)]
pub async fn category_breakdown(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let seller_id = path.into_inner();

    let series = web::block(move || service(&pool).category_breakdown(seller_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<CategoryRevenueResponse> =
        series.into_iter().map(CategoryRevenueResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /sellers/{id}/analytics/timeline — orders, revenue, and items per day.
#[utoipa::path(
    get,
    path = "/sellers/{id}/analytics/timeline",
    params(("id" = i64, Path, description = "Seller id")),
    responses((status = 200, description = "Daily order timeline", body = [DailyOrdersResponse])),
    tag = "analytics"
)]
pub async fn orders_timeline(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let seller_id = path.into_inner();

    let series = web::block(move || service(&pool).orders_timeline(seller_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<DailyOrdersResponse> =
        series.into_iter().map(DailyOrdersResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /sellers/{id}/analytics/top-products — totals per product.
#[utoipa::path(
    get,
    path = "/sellers/{id}/analytics/top-products",
    params(("id" = i64, Path, description = "Seller id")),
    responses((status = 200, description = "Per-product totals", body = [ProductTotalsResponse])),
    tag = "analytics"
)]
pub async fn top_products(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let seller_id = path.into_inner();

    let series = web::block(move || service(&pool).top_products(seller_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<ProductTotalsResponse> =
        series.into_iter().map(ProductTotalsResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::order::ProductView;
use crate::domain::ports::ProductRepository;
use crate::errors::AppError;
use crate::infrastructure::product_repo::{CachedProductRepository, DieselProductRepository};

/// Catalog reads go through the shared request cache; checkout snapshots
/// bypass it and read the live rows.
pub type Catalog = CachedProductRepository<DieselProductRepository>;

const DEFAULT_DEALS_LIMIT: i64 = 20;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: i64,
    pub seller_id: i64,
    pub name: String,
    pub sku: String,
    pub category: Option<String>,
    pub price: String,
    pub image_url: String,
    pub created_at: String,
}

impl From<ProductView> for ProductResponse {
    fn from(p: ProductView) -> Self {
        ProductResponse {
            id: p.id,
            seller_id: p.seller_id,
            name: p.name,
            sku: p.sku,
            category: p.category,
            price: p.price.to_string(),
            image_url: p.image_url,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductListParams {
    pub category: Option<String>,
    pub seller_id: Option<i64>,
    /// When true, returns the cheapest products first.
    pub deals: Option<bool>,
    /// Maximum rows for the deals listing. Defaults to 20, maximum 100.
    pub limit: Option<i64>,
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = ProductResponse),
        (status = 404, description = "No such product"),
    ),
    tag = "products"
)]
pub async fn get_product(
    catalog: web::Data<Catalog>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let product = web::block(move || catalog.find_by_id(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match product {
        Some(product) => Ok(HttpResponse::Ok().json(ProductResponse::from(product))),
        None => Err(AppError::NotFound),
    }
}

/// GET /products?category= | ?seller_id= | ?deals=true
///
/// Exactly one filter is applied, in that precedence order.
#[utoipa::path(
    get,
    path = "/products",
    params(
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("seller_id" = Option<i64>, Query, description = "Filter by seller"),
        ("deals" = Option<bool>, Query, description = "Cheapest first"),
        ("limit" = Option<i64>, Query, description = "Deals row cap (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Matching products", body = [ProductResponse]),
        (status = 400, description = "No filter given"),
    ),
    tag = "products"
)]
pub async fn list_products(
    catalog: web::Data<Catalog>,
    query: web::Query<ProductListParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();

    let products = web::block(move || {
        if let Some(category) = params.category.as_deref() {
            catalog.list_by_category(category)
        } else if let Some(seller_id) = params.seller_id {
            catalog.list_by_seller(seller_id)
        } else if params.deals == Some(true) {
            let limit = params.limit.unwrap_or(DEFAULT_DEALS_LIMIT).clamp(1, 100);
            catalog.list_deals(limit)
        } else {
            Err(crate::domain::errors::DomainError::InvalidInput(
                "specify category, seller_id or deals=true".to_string(),
            ))
        }
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

use std::str::FromStr;

use actix_web::{web, HttpRequest, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::checkout::CheckoutService;
use crate::db::DbPool;
use crate::domain::cart::{CartLine, CartStore};
use crate::domain::checkout::{Address, CheckoutForm, TipState};
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderStatus, OrderView, PaymentStatus};
use crate::domain::ports::{OrderRepository, UserDirectory};
use crate::errors::AppError;
use crate::infrastructure::order_repo::DieselOrderRepository;
use crate::infrastructure::product_repo::DieselProductRepository;
use crate::infrastructure::user_directory::DieselUserDirectory;

use super::principal_from;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CartLineRequest {
    pub product_id: i64,
    pub title: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    #[serde(default)]
    pub image: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddressDto {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
}

impl From<AddressDto> for Address {
    fn from(dto: AddressDto) -> Self {
        Address {
            first_name: dto.first_name,
            last_name: dto.last_name,
            address: dto.address,
            city: dto.city,
            postal_code: dto.postal_code,
            country: dto.country,
            phone: dto.phone,
        }
    }
}

impl From<Address> for AddressDto {
    fn from(a: Address) -> Self {
        AddressDto {
            first_name: a.first_name,
            last_name: a.last_name,
            address: a.address,
            city: a.city,
            postal_code: a.postal_code,
            country: a.country,
            phone: a.phone,
        }
    }
}

/// Tip selection: either a percentage of the subtotal or a manually typed
/// absolute amount, never both.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TipRequest {
    pub percent: Option<u32>,
    /// Decimal amount as a string, e.g. "5.00"
    pub amount: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    /// Client-generated key identifying this checkout attempt. Resubmitting
    /// the same key returns the order created by the first attempt.
    pub idempotency_key: Uuid,
    pub items: Vec<CartLineRequest>,
    pub shipping_address: AddressDto,
    #[serde(default)]
    pub use_different_billing: bool,
    pub billing_address: Option<AddressDto>,
    pub tip: Option<TipRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub order_id: i64,
    pub order_number: String,
    pub total_amount: String,
    pub deduplicated: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub sku: String,
    pub price: String,
    pub quantity: u32,
    pub total_price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub order_number: String,
    pub user_id: i64,
    pub total_amount: String,
    pub shipping_address: AddressDto,
    pub billing_address: AddressDto,
    pub order_status: String,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(view: OrderView) -> Self {
        OrderResponse {
            id: view.id,
            order_number: view.order_number,
            user_id: view.user_id,
            total_amount: view.total_amount.to_string(),
            shipping_address: view.shipping_address.into(),
            billing_address: view.billing_address.into(),
            order_status: view.order_status.to_string(),
            payment_status: view.payment_status.to_string(),
            payment_method: view.payment_method,
            created_at: view.created_at.to_rfc3339(),
            items: view
                .items
                .into_iter()
                .map(|i| OrderItemResponse {
                    id: i.id,
                    product_id: i.product_id,
                    product_name: i.product_name,
                    sku: i.sku,
                    price: i.price.to_string(),
                    quantity: i.quantity,
                    total_price: i.total_price.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub order_status: Option<String>,
    pub payment_status: Option<String>,
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn parse_money(field: &str, raw: &str) -> Result<BigDecimal, DomainError> {
    BigDecimal::from_str(raw)
        .map_err(|e| DomainError::InvalidInput(format!("invalid {} '{}': {}", field, raw, e)))
}

fn build_tip(tip: Option<&TipRequest>, subtotal: &BigDecimal) -> Result<TipState, DomainError> {
    let mut state = TipState::none();
    match tip {
        None => {}
        Some(TipRequest {
            percent: Some(_),
            amount: Some(_),
        }) => {
            return Err(DomainError::InvalidInput(
                "tip percent and manual amount are mutually exclusive".to_string(),
            ));
        }
        Some(TipRequest {
            percent: Some(p),
            amount: None,
        }) => state.select_percent(*p, subtotal),
        Some(TipRequest {
            percent: None,
            amount: Some(raw),
        }) => state.enter_manual(parse_money("tip amount", raw)?),
        Some(TipRequest {
            percent: None,
            amount: None,
        }) => {}
    }
    Ok(state)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /checkout
///
/// Places an order from the submitted cart and form. The order header and all
/// of its items are written in a single database transaction; a failure
/// persists nothing and the client may retry with the same idempotency key.
#[utoipa::path(
    post,
    path = "/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed", body = CheckoutResponse),
        (status = 400, description = "Malformed cart or form"),
        (status = 401, description = "No authenticated principal"),
        (status = 409, description = "Principal has no application user row"),
        (status = 500, description = "Write failed, retryable"),
    ),
    tag = "checkout"
)]
pub async fn checkout(
    pool: web::Data<DbPool>,
    req: HttpRequest,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let principal = principal_from(&req);
    let body = body.into_inner();

    let placement = web::block(move || {
        let mut cart = CartStore::new();
        for line in &body.items {
            cart.add_item(CartLine {
                product_id: line.product_id,
                title: line.title.clone(),
                price: parse_money("price", &line.price)?,
                image: line.image.clone(),
                quantity: line.quantity,
            });
        }

        let tip = build_tip(body.tip.as_ref(), &cart.total_price())?;
        let form = CheckoutForm {
            shipping: body.shipping_address.into(),
            use_different_billing: body.use_different_billing,
            billing: body.billing_address.map(Into::into),
            tip,
        };

        let service = CheckoutService::new(
            DieselOrderRepository::new(pool.get_ref().clone()),
            DieselUserDirectory::new(pool.get_ref().clone()),
            DieselProductRepository::new(pool.get_ref().clone()),
        );
        service.place_order(principal.as_ref(), &mut cart, &form, body.idempotency_key)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CheckoutResponse {
        order_id: placement.order_id,
        order_number: placement.order_number,
        total_amount: placement.total_amount.to_string(),
        deduplicated: placement.deduplicated,
    }))
}

/// GET /orders/{id} — one order with its items.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "The order", body = OrderResponse),
        (status = 404, description = "No such order"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let order = web::block(move || DieselOrderRepository::new(pool.get_ref().clone()).find_by_id(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound),
    }
}

/// GET /orders — the calling user's orders, newest first, headers only.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "The caller's orders", body = ListOrdersResponse),
        (status = 401, description = "No authenticated principal"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    pool: web::Data<DbPool>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let principal = principal_from(&req).ok_or(AppError::AuthRequired)?;

    let orders = web::block(move || {
        let user_id = DieselUserDirectory::new(pool.get_ref().clone())
            .resolve_user_id(&principal.email)?
            .ok_or(DomainError::UserResolutionFailed)?;
        DieselOrderRepository::new(pool.get_ref().clone()).list_for_user(user_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    let total = items.len();
    Ok(HttpResponse::Ok().json(ListOrdersResponse { items, total }))
}

/// PATCH /orders/{id}/status — seller-side status mutation.
#[utoipa::path(
    patch,
    path = "/orders/{id}/status",
    params(("id" = i64, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 204, description = "Status updated"),
        (status = 400, description = "Unknown status value or no fields"),
        (status = 404, description = "No such order"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();

    web::block(move || {
        let order_status = body
            .order_status
            .as_deref()
            .map(OrderStatus::from_str)
            .transpose()?;
        let payment_status = body
            .payment_status
            .as_deref()
            .map(PaymentStatus::from_str)
            .transpose()?;
        DieselOrderRepository::new(pool.get_ref().clone()).update_status(
            id,
            order_status,
            payment_status,
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn tip_with_both_fields_is_rejected() {
        let tip = TipRequest {
            percent: Some(15),
            amount: Some("5.00".to_string()),
        };
        assert!(build_tip(Some(&tip), &BigDecimal::from(100)).is_err());
    }

    #[test]
    fn percent_tip_is_computed_from_the_subtotal() {
        let tip = TipRequest {
            percent: Some(15),
            amount: None,
        };
        let state = build_tip(Some(&tip), &BigDecimal::from(2500)).expect("tip failed");
        assert_eq!(state.amount(), &BigDecimal::from_str("375.00").unwrap());
        assert_eq!(state.percent(), Some(15));
    }

    #[test]
    fn manual_tip_clears_the_percent_indicator() {
        let tip = TipRequest {
            percent: None,
            amount: Some("7.50".to_string()),
        };
        let state = build_tip(Some(&tip), &BigDecimal::from(2500)).expect("tip failed");
        assert_eq!(state.percent(), None);
        assert_eq!(state.amount(), &BigDecimal::from_str("7.50").unwrap());
    }

    #[test]
    fn missing_tip_defaults_to_zero() {
        let state = build_tip(None, &BigDecimal::from(2500)).expect("tip failed");
        assert_eq!(state.amount(), &BigDecimal::from(0));
    }

    #[test]
    fn malformed_money_is_invalid_input() {
        assert!(matches!(
            parse_money("price", "ten dollars"),
            Err(DomainError::InvalidInput(_))
        ));
    }
}

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{NewSeller, SellerUpdate, SellerView};
use crate::domain::ports::{SellerRepository, UserDirectory};
use crate::errors::AppError;
use crate::infrastructure::seller_repo::DieselSellerRepository;
use crate::infrastructure::user_directory::DieselUserDirectory;

use super::principal_from;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterSellerRequest {
    pub store_name: String,
    pub contact_email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSellerRequest {
    pub store_name: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SellerResponse {
    pub id: i64,
    pub user_id: i64,
    pub store_name: String,
    pub contact_email: String,
    pub created_at: String,
}

impl From<SellerView> for SellerResponse {
    fn from(s: SellerView) -> Self {
        SellerResponse {
            id: s.id,
            user_id: s.user_id,
            store_name: s.store_name,
            contact_email: s.contact_email,
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

/// POST /sellers — register the calling user as a seller.
#[utoipa::path(
    post,
    path = "/sellers",
    request_body = RegisterSellerRequest,
    responses(
        (status = 201, description = "Seller registered", body = SellerResponse),
        (status = 401, description = "No authenticated principal"),
        (status = 409, description = "Principal has no application user row"),
    ),
    tag = "sellers"
)]
pub async fn register_seller(
    pool: web::Data<DbPool>,
    req: HttpRequest,
    body: web::Json<RegisterSellerRequest>,
) -> Result<HttpResponse, AppError> {
    let principal = principal_from(&req).ok_or(AppError::AuthRequired)?;
    let body = body.into_inner();

    let seller = web::block(move || {
        let user_id = DieselUserDirectory::new(pool.get_ref().clone())
            .resolve_user_id(&principal.email)?
            .ok_or(DomainError::UserResolutionFailed)?;
        DieselSellerRepository::new(pool.get_ref().clone()).register(NewSeller {
            user_id,
            store_name: body.store_name,
            contact_email: body.contact_email,
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(SellerResponse::from(seller)))
}

/// GET /sellers/{id}
#[utoipa::path(
    get,
    path = "/sellers/{id}",
    params(("id" = i64, Path, description = "Seller id")),
    responses(
        (status = 200, description = "The seller", body = SellerResponse),
        (status = 404, description = "No such seller"),
    ),
    tag = "sellers"
)]
pub async fn get_seller(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let seller = web::block(move || DieselSellerRepository::new(pool.get_ref().clone()).find_by_id(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match seller {
        Some(seller) => Ok(HttpResponse::Ok().json(SellerResponse::from(seller))),
        None => Err(AppError::NotFound),
    }
}

/// PATCH /sellers/{id} — update store profile fields.
#[utoipa::path(
    patch,
    path = "/sellers/{id}",
    params(("id" = i64, Path, description = "Seller id")),
    request_body = UpdateSellerRequest,
    responses(
        (status = 200, description = "Updated seller", body = SellerResponse),
        (status = 400, description = "No fields to update"),
        (status = 404, description = "No such seller"),
    ),
    tag = "sellers"
)]
pub async fn update_seller(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<UpdateSellerRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();

    let seller = web::block(move || {
        DieselSellerRepository::new(pool.get_ref().clone()).update(
            id,
            SellerUpdate {
                store_name: body.store_name,
                contact_email: body.contact_email,
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(SellerResponse::from(seller)))
}

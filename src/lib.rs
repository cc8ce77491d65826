pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::infrastructure::product_repo::{CachedProductRepository, DieselProductRepository};

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::checkout,
        handlers::orders::get_order,
        handlers::orders::list_orders,
        handlers::orders::update_order_status,
        handlers::products::get_product,
        handlers::products::list_products,
        handlers::sellers::register_seller,
        handlers::sellers::get_seller,
        handlers::sellers::update_seller,
        handlers::analytics::monthly_revenue,
        handlers::analytics::category_breakdown,
        handlers::analytics::orders_timeline,
        handlers::analytics::top_products,
    ),
    tags(
        (name = "checkout", description = "Cart to persisted order"),
        (name = "orders", description = "Order reads and status updates"),
        (name = "products", description = "Catalog queries"),
        (name = "sellers", description = "Seller registration and profile"),
        (name = "analytics", description = "Seller dashboard series"),
    )
)]
pub struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    // One catalog cache shared across all workers.
    let catalog = web::Data::new(CachedProductRepository::new(DieselProductRepository::new(
        pool.clone(),
    )));

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(catalog.clone())
            .wrap(Logger::default())
            .route("/checkout", web::post().to(handlers::orders::checkout))
            .service(
                web::scope("/orders")
                    .route("", web::get().to(handlers::orders::list_orders))
                    .route("/{id}", web::get().to(handlers::orders::get_order))
                    .route(
                        "/{id}/status",
                        web::patch().to(handlers::orders::update_order_status),
                    ),
            )
            .service(
                web::scope("/products")
                    .route("", web::get().to(handlers::products::list_products))
                    .route("/{id}", web::get().to(handlers::products::get_product)),
            )
            .service(
                web::scope("/sellers")
                    .route("", web::post().to(handlers::sellers::register_seller))
                    .route("/{id}", web::get().to(handlers::sellers::get_seller))
                    .route("/{id}", web::patch().to(handlers::sellers::update_seller))
                    .route(
                        "/{id}/analytics/monthly",
                        web::get().to(handlers::analytics::monthly_revenue),
                    )
                    .route(
                        "/{id}/analytics/categories",
                        web::get().to(handlers::analytics::category_breakdown),
                    )
                    .route(
                        "/{id}/analytics/timeline",
                        web::get().to(handlers::analytics::orders_timeline),
                    )
                    .route(
                        "/{id}/analytics/top-products",
                        web::get().to(handlers::analytics::top_products),
                    ),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}

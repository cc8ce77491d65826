use std::time::Duration;

use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::ProductView;
use crate::domain::ports::ProductRepository;
use crate::schema::products;

use super::fetch_failed;
use super::models::ProductRow;
use super::query_cache::QueryCache;

/// Freshness window for catalog reads. Short enough that price edits show up
/// promptly, long enough to absorb bursts of identical queries.
const CATALOG_TTL: Duration = Duration::from_secs(30);

pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn collect(rows: Vec<ProductRow>) -> Result<Vec<ProductView>, DomainError> {
        rows.into_iter().map(ProductRow::into_view).collect()
    }
}

impl ProductRepository for DieselProductRepository {
    fn find_by_id(&self, id: i64) -> Result<Option<ProductView>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = products::table
            .filter(products::id.eq(id))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(fetch_failed)?;

        row.map(ProductRow::into_view).transpose()
    }

    fn list_by_category(&self, category: &str) -> Result<Vec<ProductView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = products::table
            .filter(products::category.eq(category))
            .order(products::created_at.desc())
            .select(ProductRow::as_select())
            .load(&mut conn)
            .map_err(fetch_failed)?;

        Self::collect(rows)
    }

    fn list_by_seller(&self, seller_id: i64) -> Result<Vec<ProductView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = products::table
            .filter(products::seller_id.eq(seller_id))
            .order(products::created_at.desc())
            .select(ProductRow::as_select())
            .load(&mut conn)
            .map_err(fetch_failed)?;

        Self::collect(rows)
    }

    fn list_deals(&self, limit: i64) -> Result<Vec<ProductView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = products::table
            .order(products::price.asc())
            .limit(limit)
            .select(ProductRow::as_select())
            .load(&mut conn)
            .map_err(fetch_failed)?;

        Self::collect(rows)
    }
}

/// Read-through cache over any [`ProductRepository`], keyed by the query
/// parameters. Only successful responses are stored.
pub struct CachedProductRepository<R> {
    inner: R,
    by_id: QueryCache<Option<ProductView>>,
    listings: QueryCache<Vec<ProductView>>,
}

impl<R: ProductRepository> CachedProductRepository<R> {
    pub fn new(inner: R) -> Self {
        Self::with_ttl(inner, CATALOG_TTL)
    }

    pub fn with_ttl(inner: R, ttl: Duration) -> Self {
        Self {
            inner,
            by_id: QueryCache::new(ttl),
            listings: QueryCache::new(ttl),
        }
    }

    fn cached_listing<F>(&self, key: String, fetch: F) -> Result<Vec<ProductView>, DomainError>
    where
        F: FnOnce() -> Result<Vec<ProductView>, DomainError>,
    {
        if let Some(hit) = self.listings.get(&key) {
            return Ok(hit);
        }
        let fresh = fetch()?;
        self.listings.insert(key, fresh.clone());
        Ok(fresh)
    }
}

impl<R: ProductRepository> ProductRepository for CachedProductRepository<R> {
    fn find_by_id(&self, id: i64) -> Result<Option<ProductView>, DomainError> {
        let key = format!("products:id={}", id);
        if let Some(hit) = self.by_id.get(&key) {
            return Ok(hit);
        }
        let fresh = self.inner.find_by_id(id)?;
        self.by_id.insert(key, fresh.clone());
        Ok(fresh)
    }

    fn list_by_category(&self, category: &str) -> Result<Vec<ProductView>, DomainError> {
        let key = format!("products:category={}", category);
        self.cached_listing(key, || self.inner.list_by_category(category))
    }

    fn list_by_seller(&self, seller_id: i64) -> Result<Vec<ProductView>, DomainError> {
        let key = format!("products:seller={}", seller_id);
        self.cached_listing(key, || self.inner.list_by_seller(seller_id))
    }

    fn list_deals(&self, limit: i64) -> Result<Vec<ProductView>, DomainError> {
        let key = format!("products:deals:limit={}", limit);
        self.cached_listing(key, || self.inner.list_deals(limit))
    }
}

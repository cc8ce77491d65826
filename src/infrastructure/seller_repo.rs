use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{NewSeller, SellerUpdate, SellerView};
use crate::domain::ports::SellerRepository;
use crate::schema::sellers;

use super::fetch_failed;
use super::models::{NewSellerRow, SellerRow};

#[derive(AsChangeset)]
#[diesel(table_name = sellers)]
struct SellerChangeset {
    store_name: Option<String>,
    contact_email: Option<String>,
    updated_at: DateTime<Utc>,
}

pub struct DieselSellerRepository {
    pool: DbPool,
}

impl DieselSellerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl SellerRepository for DieselSellerRepository {
    fn register(&self, seller: NewSeller) -> Result<SellerView, DomainError> {
        let mut conn = self.pool.get()?;

        let row: SellerRow = diesel::insert_into(sellers::table)
            .values(&NewSellerRow {
                user_id: seller.user_id,
                store_name: seller.store_name,
                contact_email: seller.contact_email,
            })
            .returning(SellerRow::as_returning())
            .get_result(&mut conn)?;

        Ok(row.into())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<SellerView>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = sellers::table
            .filter(sellers::id.eq(id))
            .select(SellerRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(fetch_failed)?;

        Ok(row.map(SellerView::from))
    }

    fn update(&self, id: i64, update: SellerUpdate) -> Result<SellerView, DomainError> {
        if update.store_name.is_none() && update.contact_email.is_none() {
            return Err(DomainError::InvalidInput(
                "no seller fields to update".to_string(),
            ));
        }

        let mut conn = self.pool.get()?;
        let row: SellerRow = diesel::update(sellers::table.filter(sellers::id.eq(id)))
            .set(&SellerChangeset {
                store_name: update.store_name,
                contact_email: update.contact_email,
                updated_at: Utc::now(),
            })
            .returning(SellerRow::as_returning())
            .get_result(&mut conn)?;

        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::DieselSellerRepository;
    use crate::domain::errors::DomainError;
    use crate::domain::order::{NewSeller, SellerUpdate};
    use crate::domain::ports::SellerRepository;
    use crate::infrastructure::testutil::{seed_storefront, setup_db};

    #[tokio::test]
    async fn register_and_update_roundtrip() {
        let (_container, pool) = setup_db().await;
        let seed = seed_storefront(&pool);
        let repo = DieselSellerRepository::new(pool);

        let seller = repo
            .register(NewSeller {
                user_id: seed.user_id,
                store_name: "Flasks R Us".to_string(),
                contact_email: "flasks@example.com".to_string(),
            })
            .expect("register failed");
        assert_eq!(seller.store_name, "Flasks R Us");

        let updated = repo
            .update(
                seller.id,
                SellerUpdate {
                    store_name: Some("Flasks & Mugs".to_string()),
                    contact_email: None,
                },
            )
            .expect("update failed");
        assert_eq!(updated.store_name, "Flasks & Mugs");
        assert_eq!(updated.contact_email, "flasks@example.com");
    }

    #[tokio::test]
    async fn update_with_no_fields_is_invalid() {
        let (_container, pool) = setup_db().await;
        let repo = DieselSellerRepository::new(pool);

        let err = repo
            .update(1, SellerUpdate::default())
            .expect_err("should fail");
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn update_of_unknown_seller_is_not_found() {
        let (_container, pool) = setup_db().await;
        let repo = DieselSellerRepository::new(pool);

        let err = repo
            .update(
                424242,
                SellerUpdate {
                    store_name: Some("Ghost Store".to_string()),
                    contact_email: None,
                },
            )
            .expect_err("should fail");
        assert!(matches!(err, DomainError::NotFound));
    }
}

use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::UserDirectory;
use crate::schema::users;

use super::fetch_failed;

/// Email → numeric user id lookup against the application user table.
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl UserDirectory for DieselUserDirectory {
    fn resolve_user_id(&self, email: &str) -> Result<Option<i64>, DomainError> {
        let mut conn = self.pool.get()?;

        users::table
            .filter(users::email.eq(email))
            .select(users::id)
            .first(&mut conn)
            .optional()
            .map_err(fetch_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::DieselUserDirectory;
    use crate::domain::ports::UserDirectory;
    use crate::infrastructure::testutil::{seed_storefront, setup_db};

    #[tokio::test]
    async fn resolves_seeded_email_and_misses_unknown() {
        let (_container, pool) = setup_db().await;
        let seed = seed_storefront(&pool);
        let directory = DieselUserDirectory::new(pool);

        let id = directory
            .resolve_user_id("grace@example.com")
            .expect("resolve failed");
        assert_eq!(id, Some(seed.user_id));

        let missing = directory
            .resolve_user_id("stranger@example.com")
            .expect("resolve failed");
        assert_eq!(missing, None);
    }
}

//! # Category Repository
//!
//! Categories are read-only through the API; `insert` exists for seeding.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use storefront_core::Category;

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// All categories, alphabetical.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let category =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(category)
    }

    /// Inserts a category.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Name already taken
    pub async fn insert(&self, name: &str) -> DbResult<Category> {
        debug!(name, "Inserting category");

        let result = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES (?1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await;

        result.map_err(|err| match DbError::from(err) {
            DbError::UniqueViolation { .. } => DbError::duplicate("category name", name),
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        repo.insert("Tea").await.unwrap();
        let coffee = repo.insert("Coffee").await.unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Coffee", "Tea"]);

        let fetched = repo.get_by_id(coffee.id).await.unwrap().unwrap();
        assert_eq!(fetched, coffee);
    }

    #[tokio::test]
    async fn test_duplicate_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.categories().insert("Tea").await.unwrap();

        let err = db.categories().insert("Tea").await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}

//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Catalog listing (newest first)
//! - Batch lookups by id in three projections
//! - Admin insert and partial update
//!
//! ## Projections
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Method            Columns                          Used by             │
//! │  ──────            ───────                          ───────             │
//! │  get_many          all                              POST by-id          │
//! │  price_listings    id, name, price_cents            POST by-ids         │
//! │  cart_products     id, name, price_cents, image_url POST /api/cart      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::push_id_list;
use storefront_core::{CartProduct, NewProduct, PriceListing, Product, ProductPatch};

const PRODUCT_COLUMNS: &str = "id, name, description, price_cents, stock, category_id, \
                               image_url, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let catalog = repo.list_newest().await?;
/// let product = repo.get_by_id(7).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product, newest first.
    pub async fn list_newest(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM products ORDER BY created_at DESC, id DESC",
            PRODUCT_COLUMNS
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS);

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Full product records for a list of ids. Unknown ids are skipped.
    pub async fn get_many(&self, ids: &[i64]) -> DbResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        debug!(count = ids.len(), "Fetching products by id");

        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM products WHERE id IN ",
            PRODUCT_COLUMNS
        ));
        push_id_list(&mut builder, ids);
        builder.push(" ORDER BY id");

        let products = builder
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// `(id, name, price_cents)` for a list of ids. An empty list returns
    /// nothing without querying.
    pub async fn price_listings(&self, ids: &[i64]) -> DbResult<Vec<PriceListing>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder =
            QueryBuilder::<Sqlite>::new("SELECT id, name, price_cents FROM products WHERE id IN ");
        push_id_list(&mut builder, ids);
        builder.push(" ORDER BY id");

        let listings = builder
            .build_query_as::<PriceListing>()
            .fetch_all(&self.pool)
            .await?;

        Ok(listings)
    }

    /// Product data for a client-held cart.
    pub async fn cart_products(&self, ids: &[i64]) -> DbResult<Vec<CartProduct>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT id, name, price_cents, image_url FROM products WHERE id IN ",
        );
        push_id_list(&mut builder, ids);
        builder.push(" ORDER BY id");

        let products = builder
            .build_query_as::<CartProduct>()
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Whether a product with this id exists.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with its generated id
    /// * `Err(DbError::NotFound)` - The category does not exist
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        debug!(name = %product.name, category_id = product.category_id, "Inserting product");

        let now = Utc::now();
        let sql = format!(
            r#"
            INSERT INTO products (
                name, description, price_cents, stock, category_id,
                image_url, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );

        let result = sqlx::query_as::<_, Product>(&sql)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price_cents)
            .bind(product.stock)
            .bind(product.category_id)
            .bind(&product.image_url)
            .bind(now)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(inserted) => Ok(inserted),
            Err(err) => match DbError::from(err) {
                DbError::ForeignKeyViolation { .. } => {
                    Err(DbError::not_found("Category", product.category_id))
                }
                other => Err(other),
            },
        }
    }

    /// Applies a partial update. `None` fields keep their current value.
    ///
    /// Order lines keep the price they were bought at; only the catalog row
    /// changes.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The updated product
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: i64, patch: &ProductPatch) -> DbResult<Product> {
        debug!(id, "Updating product");

        let sql = format!(
            r#"
            UPDATE products SET
                name = COALESCE(?2, name),
                description = COALESCE(?3, description),
                price_cents = COALESCE(?4, price_cents),
                stock = COALESCE(?5, stock),
                category_id = COALESCE(?6, category_id),
                image_url = COALESCE(?7, image_url),
                updated_at = ?8
            WHERE id = ?1
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );

        let result = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(&patch.name)
            .bind(&patch.description)
            .bind(patch.price_cents)
            .bind(patch.stock)
            .bind(patch.category_id)
            .bind(&patch.image_url)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await;

        match result {
            Ok(Some(product)) => Ok(product),
            Ok(None) => Err(DbError::not_found("Product", id)),
            Err(err) => match DbError::from(err) {
                DbError::ForeignKeyViolation { .. } => Err(DbError::not_found(
                    "Category",
                    patch.category_id.unwrap_or_default(),
                )),
                other => Err(other),
            },
        }
    }

    /// Counts products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let category = db.categories().insert("Tea").await.unwrap();
        (db, category.id)
    }

    fn new_product(name: &str, price_cents: i64, category_id: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: format!("{} description", name),
            price_cents,
            stock: 10,
            category_id,
            image_url: format!("https://cdn.example.com/{}.png", name),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let (db, category_id) = setup().await;
        let repo = db.products();

        let inserted = repo.insert(&new_product("Sencha", 1200, category_id)).await.unwrap();
        assert!(inserted.id > 0);
        assert_eq!(inserted.price_cents, 1200);

        let fetched = repo.get_by_id(inserted.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Sencha");
        assert_eq!(fetched.category_id, Some(category_id));

        assert!(repo.get_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_with_missing_category() {
        let (db, _) = setup().await;

        let err = db
            .products()
            .insert(&new_product("Sencha", 1200, 404))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (db, category_id) = setup().await;
        let repo = db.products();

        let first = repo.insert(&new_product("First", 100, category_id)).await.unwrap();
        let second = repo.insert(&new_product("Second", 200, category_id)).await.unwrap();

        let listed = repo.list_newest().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test]
    async fn test_batch_lookups() {
        let (db, category_id) = setup().await;
        let repo = db.products();

        let a = repo.insert(&new_product("A", 100, category_id)).await.unwrap();
        let b = repo.insert(&new_product("B", 250, category_id)).await.unwrap();

        let products = repo.get_many(&[a.id, b.id, 9999]).await.unwrap();
        assert_eq!(products.len(), 2);

        let listings = repo.price_listings(&[b.id]).await.unwrap();
        assert_eq!(
            listings,
            vec![PriceListing {
                id: b.id,
                name: "B".to_string(),
                price_cents: 250
            }]
        );

        assert!(repo.price_listings(&[]).await.unwrap().is_empty());

        let cart = repo.cart_products(&[a.id]).await.unwrap();
        assert_eq!(cart[0].image_url.as_deref(), Some("https://cdn.example.com/A.png"));
    }

    #[tokio::test]
    async fn test_partial_update() {
        let (db, category_id) = setup().await;
        let repo = db.products();

        let product = repo.insert(&new_product("Sencha", 1200, category_id)).await.unwrap();

        let patch = ProductPatch {
            price_cents: Some(1500),
            ..Default::default()
        };
        let updated = repo.update(product.id, &patch).await.unwrap();

        assert_eq!(updated.price_cents, 1500);
        assert_eq!(updated.name, "Sencha");
        assert_eq!(updated.stock, 10);

        let err = repo.update(9999, &patch).await.unwrap_err();
        assert!(err.is_not_found());
    }
}

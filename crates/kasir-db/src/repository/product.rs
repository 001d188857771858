//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - List / get with the category eager-loaded (one LEFT JOIN, no N+1)
//! - Create, replace, delete
//!
//! Stock is only ever *set* here. Decrements happen exclusively inside the
//! checkout unit of work in [`super::transaction`].
//!
//! ## Eager Loading
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products p LEFT JOIN categories c ON c.id = p.category_id             │
//! │                                                                         │
//! │  p.id │ p.name      │ price │ stock │ category_id │ c.name  │ ...      │
//! │  ─────┼─────────────┼───────┼───────┼─────────────┼─────────┤          │
//! │  1    │ Kopi Gadjah │ 2000  │ 10    │ 1           │ Minuman │ ← Some   │
//! │  6    │ Es Batu     │ 500   │ 40    │ NULL        │ NULL    │ ← None   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasir_core::validation::validate_product_input;
use kasir_core::{Category, Product, ProductInput, ProductWithCategory};

const SELECT_WITH_CATEGORY: &str = r#"
    SELECT
        p.id,
        p.name,
        p.price,
        p.stock,
        p.category_id,
        c.name AS category_name,
        c.description AS category_description
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

/// Flat row of the product/category join.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price: i64,
    stock: i64,
    category_id: Option<i64>,
    category_name: Option<String>,
    category_description: Option<String>,
}

impl From<ProductRow> for ProductWithCategory {
    fn from(row: ProductRow) -> Self {
        let category = match (row.category_id, row.category_name) {
            (Some(id), Some(name)) => Some(Category {
                id,
                name,
                description: row.category_description.unwrap_or_default(),
            }),
            _ => None,
        };

        ProductWithCategory {
            product: Product {
                id: row.id,
                name: row.name,
                unit_price: row.price,
                stock_quantity: row.stock,
                category_id: row.category_id,
            },
            category,
        }
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let all = repo.list().await?;
/// let one = repo.get_by_id(1).await?;
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

    /// Lists all products ordered by id, each with its category.
    pub async fn list(&self) -> DbResult<Vec<ProductWithCategory>> {
        let sql = format!("{SELECT_WITH_CATEGORY} ORDER BY p.id");

        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed products");
        Ok(rows.into_iter().map(ProductWithCategory::from).collect())
    }

    /// Gets a product by its ID, with its category.
    ///
    /// ## Returns
    /// * `Ok(Some(ProductWithCategory))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<ProductWithCategory>> {
        let sql = format!("{SELECT_WITH_CATEGORY} WHERE p.id = ?1");

        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ProductWithCategory::from))
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(ProductWithCategory)` - Inserted product with generated id
    /// * `Err(DbError::Validation)` - Bad name, price or stock
    /// * `Err(DbError::ForeignKeyViolation)` - `category_id` doesn't exist
    pub async fn insert(&self, input: &ProductInput) -> DbResult<ProductWithCategory> {
        validate_product_input(input)?;
        debug!(name = %input.name, "Inserting product");

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products (name, price, stock, category_id)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id
            "#,
        )
        .bind(input.name.trim())
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category_id)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Replaces a product's fields, stock included.
    ///
    /// ## Returns
    /// * `Ok(ProductWithCategory)` - Updated product
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: i64, input: &ProductInput) -> DbResult<ProductWithCategory> {
        validate_product_input(input)?;
        debug!(id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                price = ?3,
                stock = ?4,
                category_id = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product.
    ///
    /// Past transaction details keep their name and price snapshot.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use kasir_core::{CategoryInput, ValidationError};

    fn input(name: &str, price: i64, stock: i64, category_id: Option<i64>) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            price,
            stock,
            category_id,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_with_category() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let minuman = db
            .categories()
            .insert(&CategoryInput {
                name: "Minuman".to_string(),
                description: "Minuman segar".to_string(),
            })
            .await
            .unwrap();

        let repo = db.products();
        let kopi = repo
            .insert(&input("Kopi Gadjah", 2000, 10, Some(minuman.id)))
            .await
            .unwrap();
        let es = repo.insert(&input("Es Batu", 500, 40, None)).await.unwrap();

        assert_eq!(kopi.product.name, "Kopi Gadjah");
        assert_eq!(kopi.product.unit_price, 2000);
        assert_eq!(kopi.product.stock_quantity, 10);
        assert_eq!(kopi.category, Some(minuman));
        assert!(es.category.is_none());

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], kopi);
        assert_eq!(all[1], es);

        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();
        let indomie = repo.insert(&input("Indomie", 2500, 20, None)).await.unwrap();
        let id = indomie.product.id;

        let updated = repo
            .update(id, &input("Indomie Goreng", 3000, 15, None))
            .await
            .unwrap();
        assert_eq!(updated.product.name, "Indomie Goreng");
        assert_eq!(updated.product.unit_price, 3000);
        assert_eq!(updated.product.stock_quantity, 15);

        repo.delete(id).await.unwrap();
        assert!(repo.get_by_id(id).await.unwrap().is_none());
        assert!(matches!(repo.delete(id).await, Err(DbError::NotFound { .. })));
        assert!(matches!(
            repo.update(id, &input("X", 1, 1, None)).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_rejects_invalid_input() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        assert!(matches!(
            repo.insert(&input("Teh", 1500, -1, None)).await,
            Err(DbError::Validation(ValidationError::Negative { .. }))
        ));
        assert!(matches!(
            repo.insert(&input("", 1500, 5, None)).await,
            Err(DbError::Validation(ValidationError::Required { .. }))
        ));
        assert!(matches!(
            repo.insert(&input("Teh", 1500, 5, Some(77))).await,
            Err(DbError::ForeignKeyViolation { .. })
        ));
        assert!(repo.list().await.unwrap().is_empty());
    }
}

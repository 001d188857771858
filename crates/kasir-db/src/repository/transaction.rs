//! # Transaction Repository
//!
//! The storage half of the checkout engine, plus the daily report.
//!
//! ## Checkout Unit of Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    process_checkout(items)                              │
//! │                                                                         │
//! │  validate_items() ──► EmptyCheckout / InvalidQuantity (no I/O yet)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │       │                                                                 │
//! │       ▼   for each item, in input order                                │
//! │  UPDATE products SET stock = stock - q                                 │
//! │   WHERE id = ? AND stock >= q                                          │
//! │   RETURNING id, name, price, stock, category_id                        │
//! │       │                                                                 │
//! │       ├── row ──► CheckoutTotals::stage() (name/price snapshot)        │
//! │       │                                                                 │
//! │       └── no row ──► SELECT stock ──► ProductNotFound                  │
//! │                                  └──► InsufficientStock                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT transactions ──► id                                            │
//! │  INSERT transaction_details × n (input order)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT   (any error, timeout or dropped future before it: ROLLBACK)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Oversell Protection
//! The decrement is conditional: it only matches while `stock >= q`, so two
//! checkouts can never both take the last unit. The first statement of the
//! unit of work is that write, which takes SQLite's write lock immediately;
//! concurrent checkouts queue on `busy_timeout` instead of interleaving.
//! Repeating a product id in one cart decrements it once per line, each line
//! checked against what the previous lines left.
//!
//! ## Report Window
//! A report covers `[local midnight, next local midnight)` in the configured
//! offset, converted to UTC. `created_at` is stored as RFC 3339 UTC text, so
//! the range filter compares strings.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{CheckoutError, CheckoutResult, DbError, DbResult};
use kasir_core::checkout::{validate_items, CheckoutTotals};
use kasir_core::{
    BestSeller, CheckoutItem, CoreError, DailyReport, Product, Transaction, TransactionDetail,
};

const BEST_SELLER_SQL: &str = r#"
    WITH day_sales AS (
        SELECT
            td.product_id,
            SUM(td.quantity) AS quantity_sold,
            MAX(td.id) AS last_detail_id
        FROM transaction_details td
        INNER JOIN transactions t ON t.id = td.transaction_id
        WHERE t.created_at >= ?1 AND t.created_at < ?2
        GROUP BY td.product_id
    )
    SELECT d.product_name, s.quantity_sold
    FROM day_sales s
    INNER JOIN transaction_details d ON d.id = s.last_detail_id
    ORDER BY s.quantity_sold DESC, s.product_id ASC
    LIMIT 1
"#;

/// Repository for the transaction ledger.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.transactions();
///
/// let tx = repo.process_checkout(&[CheckoutItem::new(1, 3)]).await?;
/// let report = repo.get_today_report().await?;
/// ```
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
    report_offset: FixedOffset,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository reporting in the given offset.
    pub fn new(pool: SqlitePool, report_offset: FixedOffset) -> Self {
        TransactionRepository {
            pool,
            report_offset,
        }
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Converts a cart into a persisted transaction, decrementing stock.
    ///
    /// All or nothing: on any error no stock moves and no ledger row exists.
    ///
    /// ## Returns
    /// * `Ok(Transaction)` - Header with details in input order
    /// * `Err(CheckoutError::Rejected)` - Empty cart, bad quantity, unknown
    ///   product or not enough stock
    /// * `Err(CheckoutError::StorageFailure)` - SQLite or pool fault
    pub async fn process_checkout(&self, items: &[CheckoutItem]) -> CheckoutResult<Transaction> {
        self.checkout(items, None).await
    }

    /// [`process_checkout`](Self::process_checkout) with a deadline on the
    /// staging work.
    ///
    /// The deadline covers everything up to COMMIT. If it passes first the
    /// staged writes are rolled back and `CheckoutError::TimedOut` is
    /// returned. Once COMMIT is issued it runs to completion on its own task,
    /// so the outcome reported is always the outcome stored.
    pub async fn process_checkout_with_timeout(
        &self,
        items: &[CheckoutItem],
        limit: std::time::Duration,
    ) -> CheckoutResult<Transaction> {
        self.checkout(items, Some(limit)).await
    }

    async fn checkout(
        &self,
        items: &[CheckoutItem],
        limit: Option<std::time::Duration>,
    ) -> CheckoutResult<Transaction> {
        match self.run_checkout(items, limit).await {
            Ok(transaction) => {
                info!(
                    transaction_id = transaction.id,
                    total_amount = transaction.total_amount,
                    lines = transaction.details.len(),
                    "Checkout committed"
                );
                Ok(transaction)
            }
            Err(CheckoutError::Rejected(err)) => {
                warn!(product_id = ?err.product_id(), error = %err, "Checkout rejected");
                Err(CheckoutError::Rejected(err))
            }
            Err(CheckoutError::TimedOut(limit)) => {
                warn!(
                    limit_ms = limit.as_millis() as u64,
                    lines = items.len(),
                    "Checkout timed out before commit, rolled back"
                );
                Err(CheckoutError::TimedOut(limit))
            }
            Err(err) => Err(err),
        }
    }

    async fn run_checkout(
        &self,
        items: &[CheckoutItem],
        limit: Option<std::time::Duration>,
    ) -> CheckoutResult<Transaction> {
        validate_items(items)?;

        let staging = self.stage_checkout(items);
        let (tx, transaction) = match limit {
            // dropping the staging future drops its sqlx transaction: ROLLBACK
            Some(limit) => tokio::time::timeout(limit, staging)
                .await
                .map_err(|_| CheckoutError::TimedOut(limit))??,
            None => staging.await?,
        };

        tokio::spawn(tx.commit())
            .await
            .map_err(|e| DbError::Internal(format!("Commit task failed: {e}")))??;

        Ok(transaction)
    }

    /// Everything up to COMMIT: reserve stock, write header and details.
    async fn stage_checkout(
        &self,
        items: &[CheckoutItem],
    ) -> CheckoutResult<(sqlx::Transaction<'static, Sqlite>, Transaction)> {
        let mut tx = self.pool.begin().await?;
        let mut totals = CheckoutTotals::new();
        let mut lines = Vec::with_capacity(items.len());

        for item in items {
            let product = reserve_stock(&mut tx, item).await?;
            debug!(
                product_id = product.id,
                quantity = item.quantity,
                remaining = product.stock_quantity,
                "Stock reserved"
            );
            lines.push(totals.stage(&product, item.quantity)?);
        }

        let created_at = Utc::now();
        let total_amount = totals.total().amount();

        let transaction_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO transactions (total_amount, created_at)
            VALUES (?1, ?2)
            RETURNING id
            "#,
        )
        .bind(total_amount)
        .bind(created_at)
        .fetch_one(&mut *tx)
        .await?;

        let mut details = Vec::with_capacity(lines.len());
        for line in lines {
            let detail_id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO transaction_details (
                    transaction_id, product_id, product_name,
                    unit_price, quantity, subtotal
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                RETURNING id
                "#,
            )
            .bind(transaction_id)
            .bind(line.product_id)
            .bind(&line.product_name)
            .bind(line.unit_price)
            .bind(line.quantity)
            .bind(line.subtotal)
            .fetch_one(&mut *tx)
            .await?;

            details.push(line.into_detail(detail_id, transaction_id));
        }

        let transaction = Transaction {
            id: transaction_id,
            total_amount,
            created_at,
            details,
        };
        Ok((tx, transaction))
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Gets a persisted transaction with its details in insertion order.
    pub async fn get_transaction(&self, id: i64) -> DbResult<Option<Transaction>> {
        let header = sqlx::query_as::<_, Transaction>(
            "SELECT id, total_amount, created_at FROM transactions WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut transaction) = header else {
            return Ok(None);
        };

        transaction.details = sqlx::query_as::<_, TransactionDetail>(
            r#"
            SELECT id, transaction_id, product_id, product_name,
                   unit_price, quantity, subtotal
            FROM transaction_details
            WHERE transaction_id = ?1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(transaction))
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Sales summary for the current calendar day in the reporting offset.
    pub async fn get_today_report(&self) -> DbResult<DailyReport> {
        let today = Utc::now().with_timezone(&self.report_offset).date_naive();
        self.get_report_for(today).await
    }

    /// Sales summary for one calendar day in the reporting offset.
    ///
    /// Totals and best seller are read inside one transaction so they agree
    /// with each other.
    pub async fn get_report_for(&self, date: NaiveDate) -> DbResult<DailyReport> {
        let (start, end) = day_bounds(date, self.report_offset)?;
        debug!(%date, %start, %end, "Building daily report");

        let mut tx = self.pool.begin().await?;

        let (total_revenue, total_transactions): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total_amount), 0), COUNT(*)
            FROM transactions
            WHERE created_at >= ?1 AND created_at < ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&mut *tx)
        .await?;

        let best_seller = sqlx::query_as::<_, (String, i64)>(BEST_SELLER_SQL)
            .bind(start)
            .bind(end)
            .fetch_optional(&mut *tx)
            .await?
            .map(|(name, quantity_sold)| BestSeller {
                name,
                quantity_sold,
            })
            .unwrap_or_default();

        tx.commit().await?;

        Ok(DailyReport {
            total_revenue,
            total_transactions,
            best_seller,
        })
    }
}

/// Decrements one line's stock, returning the product as it is afterwards.
///
/// Name and price are untouched by the decrement, so the returned row is the
/// snapshot to freeze into the detail.
async fn reserve_stock(conn: &mut SqliteConnection, item: &CheckoutItem) -> CheckoutResult<Product> {
    let reserved = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET stock = stock - ?1
        WHERE id = ?2 AND stock >= ?1
        RETURNING id, name, price, stock, category_id
        "#,
    )
    .bind(item.quantity)
    .bind(item.product_id)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(product) = reserved {
        return Ok(product);
    }

    let available: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
        .bind(item.product_id)
        .fetch_optional(&mut *conn)
        .await?;

    let err = match available {
        None => CoreError::ProductNotFound(item.product_id),
        Some(available) => CoreError::InsufficientStock {
            product_id: item.product_id,
            available,
            requested: item.quantity,
        },
    };

    Err(err.into())
}

/// UTC bounds of `[date 00:00, date+1 00:00)` at `offset`.
fn day_bounds(date: NaiveDate, offset: FixedOffset) -> DbResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = date
        .and_time(NaiveTime::MIN)
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| DbError::Internal(format!("No local midnight for {date}")))?
        .with_timezone(&Utc);

    Ok((start, start + Duration::days(1)))
}

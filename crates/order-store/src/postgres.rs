use async_trait::async_trait;
use domain::CustomerOrder;
use futures_util::TryStreamExt;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use crate::{OrderId, OrderRepository, Result};

/// PostgreSQL-backed order repository.
///
/// Each order is one row: the full order as a JSONB document plus the
/// columns needed to query it.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a new PostgreSQL order repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url` with a pool sized for a single service instance.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_order(row: PgRow) -> Result<CustomerOrder> {
        let document: serde_json::Value = row.try_get("document")?;
        let order: CustomerOrder = serde_json::from_value(document)?;
        Ok(order)
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    #[tracing::instrument(skip(self, order), fields(customer_id = %order.customer_id))]
    async fn save(&self, order: CustomerOrder) -> Result<CustomerOrder> {
        let id = order.id.unwrap_or_default();
        let order = order.with_id(id);
        let document = serde_json::to_value(&order)?;

        sqlx::query(
            r#"
            INSERT INTO customer_orders (id, customer_id, created_at, total, document)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                customer_id = EXCLUDED.customer_id,
                created_at = EXCLUDED.created_at,
                total = EXCLUDED.total,
                document = EXCLUDED.document
            "#,
        )
        .bind(id.as_uuid())
        .bind(&order.customer_id)
        .bind(order.date)
        .bind(order.total)
        .bind(document)
        .execute(&self.pool)
        .await?;

        metrics::counter!("order_store_saves_total").increment(1);
        tracing::debug!(order_id = %id, "order saved");

        Ok(order)
    }

    async fn find_all(&self) -> Result<Vec<CustomerOrder>> {
        let mut rows = sqlx::query("SELECT document FROM customer_orders ORDER BY seq ASC")
            .fetch(&self.pool);

        let mut orders = Vec::new();
        while let Some(row) = rows.try_next().await? {
            orders.push(Self::row_to_order(row)?);
        }
        Ok(orders)
    }

    async fn find_by_customer_id(&self, customer_id: &str) -> Result<Vec<CustomerOrder>> {
        let rows = sqlx::query(
            r#"
            SELECT document
            FROM customer_orders
            WHERE customer_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<CustomerOrder>> {
        let row: Option<PgRow> = sqlx::query("SELECT document FROM customer_orders WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_order).transpose()
    }
}

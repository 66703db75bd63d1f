use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

use super::CardStore;
use crate::models::{Card, CardDraft};
use crate::services::{QueryPlan, ServiceError};

/// PostgreSQL-backed store. Ids come from the `cards.id` sequence.
#[derive(Clone)]
pub struct PgCardStore {
    pool: PgPool,
}

impl PgCardStore {
    #[instrument(skip(database_url))]
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, ServiceError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), ServiceError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Insert records with their ids, skipping ids already present, then move
    /// the sequence past the largest id. An empty table keeps 1 as the next id.
    #[instrument(skip(self, cards), fields(count = cards.len()))]
    pub async fn seed(&self, cards: &[Card]) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;

        for card in cards {
            sqlx::query(
                r#"
                INSERT INTO cards (id, amount, owner)
                VALUES ($1, $2, $3)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(card.id)
            .bind(card.amount)
            .bind(&card.owner)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            SELECT setval(
                pg_get_serial_sequence('cards', 'id'),
                COALESCE((SELECT MAX(id) FROM cards), 1),
                (SELECT MAX(id) FROM cards) IS NOT NULL
            )
            "#,
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl CardStore for PgCardStore {
    #[instrument(skip(self))]
    async fn find_by_id_and_owner(
        &self,
        id: i64,
        owner: &str,
    ) -> Result<Option<Card>, ServiceError> {
        let card = sqlx::query_as::<_, Card>(
            r#"
            SELECT id, amount, owner
            FROM cards
            WHERE id = $1 AND owner = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    #[instrument(skip(self), fields(owner = %plan.owner))]
    async fn find_page_by_owner(&self, plan: &QueryPlan) -> Result<Vec<Card>, ServiceError> {
        // Only whitelisted column names ever reach the SQL text.
        let order_by = match plan.sort.known_field() {
            Some(field) => format!("{} {}, id ASC", field.column(), plan.sort.direction.as_sql()),
            None => "id ASC".to_string(),
        };

        let sql = format!(
            "SELECT id, amount, owner FROM cards WHERE owner = $1 ORDER BY {} LIMIT $2 OFFSET $3",
            order_by
        );

        let cards = sqlx::query_as::<_, Card>(&sql)
            .bind(&plan.owner)
            .bind(i64::try_from(plan.limit).unwrap_or(i64::MAX))
            .bind(i64::try_from(plan.offset).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        Ok(cards)
    }

    #[instrument(skip(self, draft), fields(card_id = ?draft.id, owner = %draft.owner))]
    async fn save(&self, draft: CardDraft) -> Result<Card, ServiceError> {
        match draft.id {
            None => {
                let card = sqlx::query_as::<_, Card>(
                    r#"
                    INSERT INTO cards (amount, owner)
                    VALUES ($1, $2)
                    RETURNING id, amount, owner
                    "#,
                )
                .bind(draft.amount)
                .bind(&draft.owner)
                .fetch_one(&self.pool)
                .await?;

                Ok(card)
            }
            Some(id) => sqlx::query_as::<_, Card>(
                r#"
                UPDATE cards
                SET amount = $3
                WHERE id = $1 AND owner = $2
                RETURNING id, amount, owner
                "#,
            )
            .bind(id)
            .bind(&draft.owner)
            .bind(draft.amount)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ServiceError::CardNotFound),
        }
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
        sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn exists_by_id_and_owner(&self, id: i64, owner: &str) -> Result<bool, ServiceError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM cards WHERE id = $1 AND owner = $2)",
        )
        .bind(id)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn health_check(&self) -> Result<(), ServiceError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

use anyhow::Context;
use async_trait::async_trait;
use calculator_sdk::{HistoryRecord, NewHistoryRecord};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    QueryOrder,
};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use super::entity::{self, Entity as HistoryEntity};
use super::migrations::Migrator;
use crate::domain::repo::HistoryRepository;

/// History stored in a `SQLite` database through sea-orm.
pub struct SeaOrmHistoryRepository {
    db: DatabaseConnection,
}

impl SeaOrmHistoryRepository {
    /// Wrap an existing connection. The schema must already be migrated.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connect to `database_url` and bring the schema up to date.
    ///
    /// In-memory databases are pinned to a single pooled connection, since
    /// each `SQLite` memory connection is its own database.
    ///
    /// # Errors
    /// Returns an error if the connection or a migration fails.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let mut options = ConnectOptions::new(database_url.to_owned());
        options.sqlx_logging(false);
        if database_url.contains(":memory:") {
            options.max_connections(1).min_connections(1);
        }

        let db = Database::connect(options)
            .await
            .with_context(|| format!("failed to open history database '{database_url}'"))?;
        Migrator::up(&db, None)
            .await
            .context("failed to migrate history database")?;

        tracing::debug!(url = database_url, "history database ready");
        Ok(Self::new(db))
    }
}

#[async_trait]
impl HistoryRepository for SeaOrmHistoryRepository {
    async fn insert(&self, record: NewHistoryRecord) -> anyhow::Result<HistoryRecord> {
        let active_model = entity::ActiveModel {
            seq: ActiveValue::NotSet,
            id: ActiveValue::Set(Uuid::now_v7()),
            operator: ActiveValue::Set(record.operator.symbol().to_owned()),
            operand_a: ActiveValue::Set(record.operand_a),
            operand_b: ActiveValue::Set(record.operand_b),
            result: ActiveValue::Set(record.result),
            created_at_us: ActiveValue::Set(Utc::now().timestamp_micros()),
        };

        let model = active_model.insert(&self.db).await?;
        model.try_into()
    }

    async fn list(&self) -> anyhow::Result<Vec<HistoryRecord>> {
        HistoryEntity::find()
            .order_by_desc(entity::Column::CreatedAtUs)
            .order_by_desc(entity::Column::Seq)
            .all(&self.db)
            .await?
            .into_iter()
            .map(HistoryRecord::try_from)
            .collect()
    }

    async fn delete_all(&self) -> anyhow::Result<u64> {
        let result = HistoryEntity::delete_many().exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}

use std::sync::Arc;

use crate::config::HistoryBackend;
use crate::domain::repo::HistoryRepository;

pub mod entity;
mod memory_repo;
pub mod migrations;
mod sea_orm_repo;

pub use memory_repo::InMemoryHistoryRepository;
pub use sea_orm_repo::SeaOrmHistoryRepository;

/// Open the configured history store.
///
/// `database_url` is only used by the `SQLite` backend.
///
/// # Errors
/// Returns an error if the database cannot be opened or migrated.
pub async fn open_history(
    backend: HistoryBackend,
    database_url: &str,
) -> anyhow::Result<Arc<dyn HistoryRepository>> {
    match backend {
        HistoryBackend::Sqlite => Ok(Arc::new(
            SeaOrmHistoryRepository::connect(database_url).await?,
        )),
        HistoryBackend::Memory => {
            tracing::info!("using in-memory calculation history");
            Ok(Arc::new(InMemoryHistoryRepository::new()))
        }
    }
}

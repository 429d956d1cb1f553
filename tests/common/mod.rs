#![allow(dead_code)]

use async_trait::async_trait;
use speciestrack::db::{DbActorHandle, NativePlantCreate};
use speciestrack::{OccurrenceRecord, OccurrenceSource, SpeciesTrackError};
use sqlx::Connection;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn unique_sqlite_path(prefix: &str) -> std::path::PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "speciestrack-{prefix}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    temp_path
}

pub async fn spawn_test_db(prefix: &str) -> (DbActorHandle, std::path::PathBuf) {
    let path = unique_sqlite_path(prefix);
    let database_url = format!("sqlite:{}", path.display());
    let db = speciestrack::db::spawn(&database_url)
        .await
        .expect("failed to spawn DbActor");
    (db, path)
}

/// Runs `sql` on its own connection to the test database, outside the actor.
pub async fn execute_sql(path: &std::path::Path, sql: &str) {
    let mut conn = sqlx::SqliteConnection::connect(&format!("sqlite:{}", path.display()))
        .await
        .expect("failed to open side connection");
    sqlx::query(sql)
        .execute(&mut conn)
        .await
        .expect("side statement failed");
    conn.close().await.expect("failed to close side connection");
}

pub fn cleanup_sqlite(path: &std::path::Path) {
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}

/// The reference rows used across tests.
pub fn sample_native_plants() -> Vec<NativePlantCreate> {
    vec![
        NativePlantCreate {
            plant_type: Some("Tree".to_string()),
            butterflies_and_moths_supported: Some("150".to_string()),
            sunset_zones: Some("7-9, 12-24".to_string()),
            ..NativePlantCreate::new("Quercus lobata", Some("Valley Oak"))
        },
        NativePlantCreate {
            plant_type: Some("Tree".to_string()),
            butterflies_and_moths_supported: Some("45".to_string()),
            sunset_zones: Some("4-10, 12-24".to_string()),
            ..NativePlantCreate::new("Aesculus californica", Some("California Buckeye"))
        },
        NativePlantCreate {
            plant_type: Some("Perennial".to_string()),
            butterflies_and_moths_supported: Some("20".to_string()),
            sunset_zones: Some("1-24".to_string()),
            ..NativePlantCreate::new("Eschscholzia californica", Some("California Poppy"))
        },
    ]
}

/// Occurrence source returning a fixed batch.
pub struct StaticSource(pub Vec<OccurrenceRecord>);

impl StaticSource {
    pub fn names(names: &[&str]) -> Self {
        Self(names.iter().map(|n| OccurrenceRecord::named(*n)).collect())
    }
}

#[async_trait]
impl OccurrenceSource for StaticSource {
    async fn fetch_occurrences(&self) -> Result<Vec<OccurrenceRecord>, SpeciesTrackError> {
        Ok(self.0.clone())
    }
}

/// Occurrence source that always fails.
pub struct FailingSource;

#[async_trait]
impl OccurrenceSource for FailingSource {
    async fn fetch_occurrences(&self) -> Result<Vec<OccurrenceRecord>, SpeciesTrackError> {
        Err(SpeciesTrackError::UnexpectedError("API error".to_string()))
    }
}

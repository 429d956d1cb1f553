use crate::db::create::{ImportSummary, NativePlantCreate, ObservationFilter, StoreSummary};
use crate::db::models::{DbNativePlant, DbObservation, NativePlantMatch};
use crate::db::schema::SQLITE_INIT;
use crate::error::SpeciesTrackError;
use crate::gbif::OccurrenceRecord;
use crate::pipeline::matcher::find_native_plant;
use chrono::{DateTime, Utc};
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Connection, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::sync::LazyLock;
use std::{str::FromStr, time::Duration};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub enum DbActorMessage {
    /// Upsert reference rows keyed by botanical name.
    ImportNativePlants(Vec<NativePlantCreate>, RpcReplyPort<Result<ImportSummary, SpeciesTrackError>>),

    /// Exact-then-prefix lookup of a GBIF scientific name.
    FindNativePlant(String, RpcReplyPort<Result<Option<NativePlantMatch>, SpeciesTrackError>>),

    /// Full reference row by exact botanical name.
    GetNativePlant(String, RpcReplyPort<Result<Option<DbNativePlant>, SpeciesTrackError>>),

    /// Match and insert one fetched batch in a single transaction.
    StoreObservations(
        Vec<OccurrenceRecord>,
        DateTime<Utc>,
        RpcReplyPort<Result<StoreSummary, SpeciesTrackError>>,
    ),

    /// List observations flagged native, filtered.
    ListNativeObservations(
        ObservationFilter,
        RpcReplyPort<Result<Vec<DbObservation>, SpeciesTrackError>>,
    ),

    /// Every stored observation, oldest first.
    ListObservations(RpcReplyPort<Result<Vec<DbObservation>, SpeciesTrackError>>),

    /// Total number of stored observations.
    CountObservations(RpcReplyPort<Result<i64, SpeciesTrackError>>),
}

#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbActorHandle {
    pub async fn import_native_plants(
        &self,
        rows: Vec<NativePlantCreate>,
    ) -> Result<ImportSummary, SpeciesTrackError> {
        ractor::call!(self.actor, DbActorMessage::ImportNativePlants, rows).map_err(|e| {
            SpeciesTrackError::RactorError(format!("DbActor ImportNativePlants RPC failed: {e}"))
        })?
    }

    pub async fn find_native_plant(
        &self,
        scientific_name: &str,
    ) -> Result<Option<NativePlantMatch>, SpeciesTrackError> {
        ractor::call!(
            self.actor,
            DbActorMessage::FindNativePlant,
            scientific_name.to_string()
        )
        .map_err(|e| {
            SpeciesTrackError::RactorError(format!("DbActor FindNativePlant RPC failed: {e}"))
        })?
    }

    pub async fn get_native_plant(
        &self,
        botanical_name: &str,
    ) -> Result<Option<DbNativePlant>, SpeciesTrackError> {
        ractor::call!(
            self.actor,
            DbActorMessage::GetNativePlant,
            botanical_name.to_string()
        )
        .map_err(|e| {
            SpeciesTrackError::RactorError(format!("DbActor GetNativePlant RPC failed: {e}"))
        })?
    }

    pub async fn store_observations(
        &self,
        records: Vec<OccurrenceRecord>,
        fetch_date: DateTime<Utc>,
    ) -> Result<StoreSummary, SpeciesTrackError> {
        ractor::call!(
            self.actor,
            DbActorMessage::StoreObservations,
            records,
            fetch_date
        )
        .map_err(|e| {
            SpeciesTrackError::RactorError(format!("DbActor StoreObservations RPC failed: {e}"))
        })?
    }

    pub async fn list_native_observations(
        &self,
        filter: ObservationFilter,
    ) -> Result<Vec<DbObservation>, SpeciesTrackError> {
        ractor::call!(self.actor, DbActorMessage::ListNativeObservations, filter).map_err(|e| {
            SpeciesTrackError::RactorError(format!(
                "DbActor ListNativeObservations RPC failed: {e}"
            ))
        })?
    }

    pub async fn list_observations(&self) -> Result<Vec<DbObservation>, SpeciesTrackError> {
        ractor::call!(self.actor, DbActorMessage::ListObservations).map_err(|e| {
            SpeciesTrackError::RactorError(format!("DbActor ListObservations RPC failed: {e}"))
        })?
    }

    pub async fn count_observations(&self) -> Result<i64, SpeciesTrackError> {
        ractor::call!(self.actor, DbActorMessage::CountObservations).map_err(|e| {
            SpeciesTrackError::RactorError(format!("DbActor CountObservations RPC failed: {e}"))
        })?
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DbActorMessage::ImportNativePlants(rows, reply) => {
                let res = self.import_native_plants(&state.pool, rows).await;
                let _ = reply.send(res);
            }
            DbActorMessage::FindNativePlant(name, reply) => {
                let res = self.find_native_plant(&state.pool, &name).await;
                let _ = reply.send(res);
            }
            DbActorMessage::GetNativePlant(name, reply) => {
                let res = self.get_native_plant(&state.pool, &name).await;
                let _ = reply.send(res);
            }
            DbActorMessage::StoreObservations(records, fetch_date, reply) => {
                let res = self
                    .store_observations(&state.pool, records, fetch_date)
                    .await;
                let _ = reply.send(res);
            }
            DbActorMessage::ListNativeObservations(filter, reply) => {
                let res = self.list_native_observations(&state.pool, filter).await;
                let _ = reply.send(res);
            }
            DbActorMessage::ListObservations(reply) => {
                let res = self.list_observations(&state.pool).await;
                let _ = reply.send(res);
            }
            DbActorMessage::CountObservations(reply) => {
                let res = self.count_observations(&state.pool).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

/// Reference columns in bind order for [`bind_native_plant`].
const NATIVE_PLANT_COLUMNS: &[&str] = &[
    "botanical_name",
    "common_name",
    "other_names",
    "alternative_common_names",
    "obsolete_names",
    "plant_type",
    "form",
    "is_cultivar",
    "rarity",
    "butterflies_and_moths_supported",
    "attracts_wildlife",
    "height",
    "width",
    "height_min",
    "height_max",
    "width_min",
    "width_max",
    "growth_rate",
    "seasonality",
    "flower_color",
    "flowering_season",
    "fragrance",
    "sun",
    "soil_drainage",
    "water_requirement",
    "summer_irrigation",
    "ease_of_care",
    "soil",
    "soil_texture",
    "soil_ph",
    "soil_toxicity",
    "mulch",
    "site_type",
    "elevation_min",
    "elevation_max",
    "rainfall_min",
    "rainfall_max",
    "hardiness",
    "sunset_zones",
    "communities_simplified",
    "communities",
    "nursery_availability",
    "companions",
    "special_uses",
    "tips",
    "pests",
    "propagation",
    "jepson_link",
    "plant_url",
    "qr_codes",
];

static NATIVE_PLANT_UPSERT: LazyLock<String> = LazyLock::new(|| {
    let columns = NATIVE_PLANT_COLUMNS.join(", ");
    let placeholders = vec!["?"; NATIVE_PLANT_COLUMNS.len() + 2].join(", ");
    let updates: Vec<String> = NATIVE_PLANT_COLUMNS
        .iter()
        .filter(|c| **c != "botanical_name")
        .map(|c| format!("{c} = excluded.{c}"))
        .collect();
    format!(
        "INSERT INTO native_plants ({columns}, created_at, updated_at) \
         VALUES ({placeholders}) \
         ON CONFLICT(botanical_name) DO UPDATE SET {}, updated_at = excluded.updated_at",
        updates.join(", ")
    )
});

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, sqlx::sqlite::SqliteArguments<'q>>;

fn bind_native_plant(query: SqliteQuery<'_>, row: NativePlantCreate) -> SqliteQuery<'_> {
    query
        .bind(row.botanical_name)
        .bind(row.common_name)
        .bind(row.other_names)
        .bind(row.alternative_common_names)
        .bind(row.obsolete_names)
        .bind(row.plant_type)
        .bind(row.form)
        .bind(row.is_cultivar)
        .bind(row.rarity)
        .bind(row.butterflies_and_moths_supported)
        .bind(row.attracts_wildlife)
        .bind(row.height)
        .bind(row.width)
        .bind(row.height_min)
        .bind(row.height_max)
        .bind(row.width_min)
        .bind(row.width_max)
        .bind(row.growth_rate)
        .bind(row.seasonality)
        .bind(row.flower_color)
        .bind(row.flowering_season)
        .bind(row.fragrance)
        .bind(row.sun)
        .bind(row.soil_drainage)
        .bind(row.water_requirement)
        .bind(row.summer_irrigation)
        .bind(row.ease_of_care)
        .bind(row.soil)
        .bind(row.soil_texture)
        .bind(row.soil_ph)
        .bind(row.soil_toxicity)
        .bind(row.mulch)
        .bind(row.site_type)
        .bind(row.elevation_min)
        .bind(row.elevation_max)
        .bind(row.rainfall_min)
        .bind(row.rainfall_max)
        .bind(row.hardiness)
        .bind(row.sunset_zones)
        .bind(row.communities_simplified)
        .bind(row.communities)
        .bind(row.nursery_availability)
        .bind(row.companions)
        .bind(row.special_uses)
        .bind(row.tips)
        .bind(row.pests)
        .bind(row.propagation)
        .bind(row.jepson_link)
        .bind(row.plant_url)
        .bind(row.qr_codes)
}

/// `LIKE` pattern matching `needle` anywhere, with wildcards in it escaped by `\`.
fn contains_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

impl DbActor {
    async fn import_native_plants(
        &self,
        pool: &SqlitePool,
        rows: Vec<NativePlantCreate>,
    ) -> Result<ImportSummary, SpeciesTrackError> {
        let mut conn = pool.acquire().await?;
        let res = import_batch(&mut conn, rows).await;
        if let Err(e) = &res {
            warn!(error = %e, "Native plant import aborted; discarding its connection");
            conn.close_on_drop();
        }
        let summary = res?;

        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            "Native plant import committed"
        );
        Ok(summary)
    }

    async fn find_native_plant(
        &self,
        pool: &SqlitePool,
        scientific_name: &str,
    ) -> Result<Option<NativePlantMatch>, SpeciesTrackError> {
        let mut conn = pool.acquire().await?;
        Ok(find_native_plant(&mut conn, scientific_name).await?)
    }

    async fn get_native_plant(
        &self,
        pool: &SqlitePool,
        botanical_name: &str,
    ) -> Result<Option<DbNativePlant>, SpeciesTrackError> {
        let row = sqlx::query_as::<_, DbNativePlant>(
            r#"
        SELECT *
        FROM native_plants
        WHERE botanical_name = ?
        "#,
        )
        .bind(botanical_name)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    /// Per-record failures are skipped behind a savepoint; anything failing at
    /// the batch level drops the transaction and nothing from the run is kept.
    async fn store_observations(
        &self,
        pool: &SqlitePool,
        records: Vec<OccurrenceRecord>,
        fetch_date: DateTime<Utc>,
    ) -> Result<StoreSummary, SpeciesTrackError> {
        let mut conn = pool.acquire().await?;
        let res = store_batch(&mut conn, &records, fetch_date).await;
        if let Err(e) = &res {
            warn!(error = %e, "Observation batch aborted; discarding its connection");
            // sqlx may still count a transaction open on it.
            conn.close_on_drop();
        }
        res
    }

    async fn list_native_observations(
        &self,
        pool: &SqlitePool,
        filter: ObservationFilter,
    ) -> Result<Vec<DbObservation>, SpeciesTrackError> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT id, scientific_name, common_name, occurrence_id, observation_count, \
             observation_type, native, decimal_latitude, decimal_longitude, fetch_date, \
             created_at, updated_at \
             FROM gbif_data WHERE native = 1",
        );

        if let Some(start) = filter.start_time {
            qb.push(" AND julianday(fetch_date) >= julianday(")
                .push_bind(start)
                .push(")");
        }
        if let Some(end) = filter.end_time {
            qb.push(" AND julianday(fetch_date) <= julianday(")
                .push_bind(end)
                .push(")");
        }
        if let Some(common_name) = filter.common_name.as_deref() {
            qb.push(" AND common_name LIKE ")
                .push_bind(contains_pattern(common_name))
                .push(" ESCAPE '\\'");
        }
        if let Some(scientific_name) = filter.scientific_name.as_deref() {
            qb.push(" AND scientific_name LIKE ")
                .push_bind(contains_pattern(scientific_name))
                .push(" ESCAPE '\\'");
        }
        qb.push(" ORDER BY id");

        let rows = qb.build_query_as::<DbObservation>().fetch_all(pool).await?;
        debug!(count = rows.len(), ?filter, "Listed native observations");
        Ok(rows)
    }

    async fn list_observations(
        &self,
        pool: &SqlitePool,
    ) -> Result<Vec<DbObservation>, SpeciesTrackError> {
        let rows = sqlx::query_as::<_, DbObservation>(
            r#"
        SELECT id, scientific_name, common_name, occurrence_id, observation_count,
               observation_type, native, decimal_latitude, decimal_longitude, fetch_date,
               created_at, updated_at
        FROM gbif_data
        ORDER BY id
        "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    async fn count_observations(&self, pool: &SqlitePool) -> Result<i64, SpeciesTrackError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gbif_data")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

async fn import_batch(
    conn: &mut SqliteConnection,
    rows: Vec<NativePlantCreate>,
) -> Result<ImportSummary, SpeciesTrackError> {
    let mut summary = ImportSummary::default();
    let mut tx = conn.begin().await?;

    for mut row in rows {
        row.botanical_name = row.botanical_name.trim().to_string();
        if row.botanical_name.is_empty() {
            warn!("Skipping native plant row without a botanical name");
            summary.skipped += 1;
            continue;
        }
        let name = row.botanical_name.clone();

        match upsert_native_plant(&mut tx, row).await? {
            Ok(()) => summary.imported += 1,
            Err(e) => {
                warn!(botanical_name = %name, error = %e, "Failed to import native plant; skipping");
                summary.skipped += 1;
            }
        }
    }

    tx.commit().await?;
    Ok(summary)
}

async fn store_batch(
    conn: &mut SqliteConnection,
    records: &[OccurrenceRecord],
    fetch_date: DateTime<Utc>,
) -> Result<StoreSummary, SpeciesTrackError> {
    let mut summary = StoreSummary::default();
    let mut tx = conn.begin().await?;

    for record in records {
        match stage_observation(&mut tx, record, fetch_date).await? {
            Ok(native) => {
                summary.stored += 1;
                if native {
                    summary.native += 1;
                }
            }
            Err(e) => {
                warn!(name = %record.name, error = %e, "Error storing GBIF entry; skipping");
                summary.skipped += 1;
            }
        }
    }

    tx.commit().await?;
    Ok(summary)
}

/// Outcome of one row written behind its own savepoint.
///
/// The outer error is batch-level: the savepoint could not be opened, released
/// or rolled back, so the enclosing transaction can no longer be trusted (SQLite
/// rolls it back by itself on `SQLITE_FULL`, `SQLITE_IOERR` or `RAISE(ROLLBACK)`).
/// The inner error belongs to the row alone and is skipped by the caller.
type RowOutcome<T> = Result<Result<T, SpeciesTrackError>, SpeciesTrackError>;

async fn upsert_native_plant(
    conn: &mut SqliteConnection,
    row: NativePlantCreate,
) -> RowOutcome<()> {
    let now = Utc::now();
    let mut savepoint = conn.begin().await?;

    let res = bind_native_plant(sqlx::query(NATIVE_PLANT_UPSERT.as_str()), row)
        .bind(now)
        .bind(now)
        .execute(&mut *savepoint)
        .await;

    match res {
        Ok(_) => {
            savepoint.commit().await?;
            Ok(Ok(()))
        }
        Err(e) => {
            savepoint.rollback().await?;
            Ok(Err(e.into()))
        }
    }
}

/// Matches and inserts one record; the row outcome says whether it was flagged native.
async fn stage_observation(
    conn: &mut SqliteConnection,
    record: &OccurrenceRecord,
    fetch_date: DateTime<Utc>,
) -> RowOutcome<bool> {
    if record.name.trim().is_empty() {
        return Ok(Err(SpeciesTrackError::BlankScientificName));
    }

    let mut savepoint = conn.begin().await?;

    match insert_observation(&mut savepoint, record, fetch_date).await {
        Ok(native) => {
            savepoint.commit().await?;
            Ok(Ok(native))
        }
        Err(e) => {
            savepoint.rollback().await?;
            Ok(Err(e))
        }
    }
}

async fn insert_observation(
    conn: &mut SqliteConnection,
    record: &OccurrenceRecord,
    fetch_date: DateTime<Utc>,
) -> Result<bool, SpeciesTrackError> {
    let matched = find_native_plant(&mut *conn, &record.name).await?;
    let native = matched.is_some();
    let common_name = matched.and_then(|m| m.common_name);
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO gbif_data (
            scientific_name, common_name, occurrence_id, observation_count, observation_type,
            native, decimal_latitude, decimal_longitude, fetch_date, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.name)
    .bind(common_name)
    .bind(&record.occurrence_id)
    .bind(record.count)
    .bind(&record.observation_type)
    .bind(native)
    .bind(record.decimal_latitude)
    .bind(record.decimal_longitude)
    .bind(fetch_date)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(native)
}

/// Spawn the database actor and return a cloneable handle.
pub async fn spawn(database_url: &str) -> Result<DbActorHandle, SpeciesTrackError> {
    let (actor, _jh) = ractor::Actor::spawn(None, DbActor, database_url.to_string())
        .await
        .map_err(|e| SpeciesTrackError::RactorError(format!("failed to spawn DbActor: {e}")))?;

    Ok(DbActorHandle { actor })
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), SpeciesTrackError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("Oak"), "%Oak%");
        assert_eq!(contains_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn upsert_binds_every_reference_column() {
        let sql = NATIVE_PLANT_UPSERT.as_str();
        assert_eq!(sql.matches('?').count(), NATIVE_PLANT_COLUMNS.len() + 2);
        assert!(sql.contains("ON CONFLICT(botanical_name) DO UPDATE SET common_name = excluded.common_name"));
        assert!(!sql.contains("botanical_name = excluded.botanical_name"));
    }
}

mod common;

use async_trait::async_trait;
use common::{StaticSource, cleanup_sqlite, sample_native_plants, spawn_test_db};
use speciestrack::config::ScheduleConfig;
use speciestrack::scheduler::{GbifJobRunner, start_scheduler};
use speciestrack::{OccurrenceRecord, OccurrenceSource, SpeciesTrackError};
use std::sync::Arc;
use tokio::sync::Notify;

/// Parks inside the fetch until released.
struct GatedSource {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl OccurrenceSource for GatedSource {
    async fn fetch_occurrences(&self) -> Result<Vec<OccurrenceRecord>, SpeciesTrackError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(vec![OccurrenceRecord::named("Quercus lobata")])
    }
}

#[tokio::test]
async fn overlapping_trigger_is_skipped() {
    let (db, path) = spawn_test_db("scheduler-overlap").await;
    db.import_native_plants(sample_native_plants())
        .await
        .expect("import should succeed");

    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let runner = GbifJobRunner::new(
        Arc::new(GatedSource {
            entered: entered.clone(),
            release: release.clone(),
        }),
        db.clone(),
    );

    let first = tokio::spawn({
        let runner = runner.clone();
        async move { runner.run_once().await }
    });
    entered.notified().await;

    assert!(
        runner.run_once().await.is_none(),
        "second trigger should be dropped while the first is running"
    );

    release.notify_one();
    let summary = first
        .await
        .expect("first run panicked")
        .expect("first run should complete");
    assert_eq!(summary.stored, 1);
    assert_eq!(summary.native, 1);
    assert_eq!(db.count_observations().await.expect("count"), 1);

    cleanup_sqlite(&path);
}

#[tokio::test]
async fn sequential_runs_each_store_their_batch() {
    let (db, path) = spawn_test_db("scheduler-sequential").await;

    let runner = GbifJobRunner::new(
        Arc::new(StaticSource::names(&["Quercus lobata", "Eucalyptus globulus"])),
        db.clone(),
    );
    assert!(runner.run_once().await.is_some());
    assert!(runner.run_once().await.is_some());
    assert_eq!(db.count_observations().await.expect("count"), 4);

    cleanup_sqlite(&path);
}

#[tokio::test]
async fn disabled_schedule_starts_nothing() {
    let (db, path) = spawn_test_db("scheduler-disabled").await;

    let runner = GbifJobRunner::new(Arc::new(StaticSource(Vec::new())), db);
    let cfg = ScheduleConfig {
        enabled: false,
        ..ScheduleConfig::default()
    };
    let result = start_scheduler(&cfg, runner).await;
    assert!(matches!(result, Ok(None)));

    cleanup_sqlite(&path);
}

#[tokio::test]
async fn invalid_cron_expression_is_an_error() {
    let (db, path) = spawn_test_db("scheduler-bad-cron").await;

    let runner = GbifJobRunner::new(Arc::new(StaticSource(Vec::new())), db);
    let cfg = ScheduleConfig {
        enabled: true,
        cron: "not a cron".to_string(),
    };
    let result = start_scheduler(&cfg, runner).await;
    assert!(matches!(result, Err(SpeciesTrackError::SchedulerError(_))));

    cleanup_sqlite(&path);
}

#[tokio::test]
async fn enabled_schedule_runs_on_local_time_and_shuts_down() {
    let (db, path) = spawn_test_db("scheduler-enabled").await;

    let runner = GbifJobRunner::new(Arc::new(StaticSource(Vec::new())), db);
    let cfg = ScheduleConfig::default();
    let mut sched = match start_scheduler(&cfg, runner).await {
        Ok(Some(sched)) => sched,
        Ok(None) => panic!("default schedule should be enabled"),
        Err(e) => panic!("default schedule should start: {e}"),
    };
    sched
        .shutdown()
        .await
        .expect("scheduler should shut down cleanly");

    cleanup_sqlite(&path);
}

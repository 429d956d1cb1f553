//! Daily cron trigger for the GBIF job.

use crate::config::ScheduleConfig;
use crate::db::{DbActorHandle, StoreSummary};
use crate::error::SpeciesTrackError;
use crate::gbif::OccurrenceSource;
use crate::pipeline::run_gbif_job;
use chrono::Local;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{info, warn};

/// Runs the GBIF job, at most one run at a time per runner.
#[derive(Clone)]
pub struct GbifJobRunner {
    source: Arc<dyn OccurrenceSource>,
    db: DbActorHandle,
    in_flight: Arc<Mutex<()>>,
}

impl GbifJobRunner {
    pub fn new(source: Arc<dyn OccurrenceSource>, db: DbActorHandle) -> Self {
        Self {
            source,
            db,
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    /// `None` when a previous run is still going; that trigger is dropped.
    pub async fn run_once(&self) -> Option<StoreSummary> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            warn!("GBIF job already running; skipping this trigger");
            return None;
        };
        Some(run_gbif_job(self.source.as_ref(), &self.db).await)
    }
}

/// Builds and starts the cron scheduler, or returns `None` when disabled.
pub async fn start_scheduler(
    cfg: &ScheduleConfig,
    runner: GbifJobRunner,
) -> Result<Option<JobScheduler>, SpeciesTrackError> {
    if !cfg.enabled {
        info!("GBIF job schedule disabled");
        return Ok(None);
    }

    let sched = JobScheduler::new().await?;
    let job = Job::new_async_tz(cfg.cron.as_str(), Local, move |_uuid, _lock| {
        let runner = runner.clone();
        Box::pin(async move {
            runner.run_once().await;
        })
    })?;
    sched.add(job).await?;
    sched.start().await?;

    info!(cron = %cfg.cron, "GBIF job scheduled");
    Ok(Some(sched))
}

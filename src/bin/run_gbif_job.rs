//! Runs the GBIF fetch/match/store job once and exits.

use speciestrack::{GbifClient, config::CONFIG, run_gbif_job, utils::logging::init_tracing};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &*CONFIG;
    init_tracing(&cfg.basic.loglevel);

    let db = speciestrack::db::spawn(&cfg.basic.database_url).await?;
    let gbif = GbifClient::new(cfg.gbif.clone())?;

    let summary = run_gbif_job(&gbif, &db).await;
    let total = db.count_observations().await?;
    info!(
        stored = summary.stored,
        native = summary.native,
        skipped = summary.skipped,
        total_rows = total,
        "Manual GBIF job finished"
    );
    Ok(())
}

//! Bulk-loads the native plant reference table from a JSON array file.
//!
//! Usage: `import_native_plants <plants.json>`. Rows are upserted by
//! `botanical_name`, so re-running with a corrected file is safe.

use speciestrack::{config::CONFIG, db::NativePlantCreate, utils::logging::init_tracing};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &*CONFIG;
    init_tracing(&cfg.basic.loglevel);

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        return Err("usage: import_native_plants <plants.json>".into());
    };

    let raw = tokio::fs::read(&path).await?;
    let rows: Vec<NativePlantCreate> = serde_json::from_slice(&raw)?;
    info!(path = %path.display(), rows = rows.len(), "Importing native plants");

    let db = speciestrack::db::spawn(&cfg.basic.database_url).await?;
    let summary = db.import_native_plants(rows).await?;
    info!(
        imported = summary.imported,
        skipped = summary.skipped,
        "Native plant import finished"
    );
    Ok(())
}

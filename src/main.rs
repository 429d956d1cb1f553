use mimalloc::MiMalloc;
use speciestrack::{
    GbifClient,
    config::CONFIG,
    scheduler::{GbifJobRunner, start_scheduler},
    server::router::{SpeciesTrackState, speciestrack_router},
    utils::logging::init_tracing,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &*CONFIG;
    init_tracing(&cfg.basic.loglevel);

    info!(
        database_url = %cfg.basic.database_url,
        loglevel = %cfg.basic.loglevel,
        listen_addr = %cfg.basic.listen_addr,
        listen_port = cfg.basic.listen_port,
        gbif_api_url = %cfg.gbif.api_url,
        dataset_key = %cfg.gbif.dataset_key,
        state_province = %cfg.gbif.state_province,
        schedule = %cfg.schedule.cron,
        schedule_enabled = cfg.schedule.enabled,
    );

    let db = speciestrack::db::spawn(&cfg.basic.database_url).await?;

    let gbif = GbifClient::new(cfg.gbif.clone())?;
    let runner = GbifJobRunner::new(Arc::new(gbif), db.clone());
    let mut scheduler = start_scheduler(&cfg.schedule, runner).await?;

    let state = SpeciesTrackState::new(db);
    let app = speciestrack_router(state);

    let addr = SocketAddr::from((cfg.basic.listen_addr, cfg.basic.listen_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(sched) = scheduler.as_mut()
        && let Err(e) = sched.shutdown().await
    {
        warn!(error = %e, "Scheduler did not shut down cleanly");
    }
    info!("Server has shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

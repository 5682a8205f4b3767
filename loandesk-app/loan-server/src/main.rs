use std::net::SocketAddr;
use std::time::Duration;

use tracing::{debug, error, info};

use loan_api::{build_router, AppState};
use loan_infrastructure::{seed_demo_data, Repositories};
use loan_shared::config::AppConfig;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    loan_shared::telemetry::init_telemetry()?;

    info!("LoanDesk server starting...");

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let repos = Repositories::in_memory();
    if config.seed.demo_data {
        if config.is_production() {
            error!("Refusing to seed demo accounts in production");
        } else {
            seed_demo_data(&repos, &config.seed.demo_password).await?;
        }
    }

    let state = AppState::new(config.clone(), &repos);

    // Expired sessions are rejected on use; this only reclaims memory
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = sessions.purge_expired();
            if purged > 0 {
                debug!("Purged {} expired sessions", purged);
            }
        }
    });

    let app = build_router(state);

    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("{} listening on {}", config.app.name, addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}

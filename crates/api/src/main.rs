use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use badgelink_core::config::StoreConfig;
use badgelink_core::linking::{BadgeStore, Linker};
use badgelink_db::PgBadgeStore;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use badgelink_api::background;
use badgelink_api::config::ServerConfig;
use badgelink_api::router::build_app_router;
use badgelink_api::sessions::SessionRegistry;
use badgelink_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "badgelink_api=debug,badgelink_core=debug,badgelink_db=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let store_config =
        StoreConfig::from_env().unwrap_or_else(|e| panic!("Invalid store configuration: {e}"));

    // --- Store ---
    let pool = badgelink_db::create_pool(&store_config)
        .await
        .expect("Failed to connect to store");
    tracing::info!("Store connection pool created");

    badgelink_db::health_check(&pool)
        .await
        .expect("Store health check failed");
    tracing::info!("Store health check passed");

    badgelink_db::run_migrations(&pool)
        .await
        .expect("Failed to run store migrations");
    tracing::info!("Store migrations applied");

    let linker = Linker::new(Arc::new(PgBadgeStore::new(pool)) as Arc<dyn BadgeStore>);

    // --- Scan sessions ---
    let sessions = Arc::new(SessionRegistry::new());
    let sweep_cancel = CancellationToken::new();
    let sweep_handle = tokio::spawn(background::session_sweeper::run(
        Arc::clone(&sessions),
        Duration::from_secs(config.session_idle_timeout_secs),
        sweep_cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        linker,
        config: Arc::new(config.clone()),
        sessions: Arc::clone(&sessions),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    let cleanup_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    sweep_cancel.cancel();
    let _ = tokio::time::timeout(cleanup_timeout, sweep_handle).await;

    let open = sessions.session_count().await;
    tracing::info!(open, "Closing remaining scan sessions");
    sessions.shutdown_all().await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

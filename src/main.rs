use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clientes_api::{AppState, Stores, config::Config, routes};
use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'clientes_api';")
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let state = AppState::new(config, Stores::postgres(pool));

    // Revocation entries for naturally expired tokens are dead weight.
    let ledger = state.ledger.clone();
    let clientes = state.clientes.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(MAINTENANCE_INTERVAL);
        loop {
            ticker.tick().await;
            match ledger.purge_expired(chrono::Utc::now()).await {
                Ok(0) => {}
                Ok(n) => tracing::info!("Purged {} expired blacklist entries", n),
                Err(e) => tracing::warn!("Blacklist purge failed: {}", e),
            }

            let stats = clientes.cache().stats();
            tracing::info!(hits = stats.hits, misses = stats.misses, keys = stats.keys, "clientes cache stats");
        }
    });

    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    let app = routes::router(state);

    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app,
    )
    .await
    .expect("Failed to start server");
}

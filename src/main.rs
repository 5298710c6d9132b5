//! gov-sync - governance state synchronization for a Cosmos chain indexer
//!
//! Mirrors on-chain governance proposals into PostgreSQL:
//! - Block path: the ingestion pipeline posts each committed block to
//!   `/api/blocks`; activated proposals are reconciled against the node and
//!   passed proposals fire their side effects.
//! - Refresh path: background jobs recompute tallies and staking pool
//!   snapshots of every open proposal.

mod chain;
mod config;
mod error;
mod gov;
mod models;
mod modules;
mod proposal;
mod routes;
mod scheduler;
mod state;
mod store;
#[cfg(test)]
mod testing;

use crate::chain::{ChainSource, LcdClient};
use crate::config::{DatabaseConfig, Settings};
use crate::gov::{GovModule, ParamsRegistry};
use crate::modules::{ChainParamsModule, MintModule, Subspace};
use crate::routes::create_router;
use crate::state::AppState;
use crate::store::{GovStore, PostgresStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting gov-sync...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");

    let pool = match init_database_pool(&settings.database).await {
        Ok(pool) => {
            info!("✅ Database pool created successfully");
            pool
        }
        Err(e) => {
            error!("❌ FATAL: Failed to initialize database pool: {}", e);
            return Err(e);
        }
    };
    store::schema::create_tables(&pool).await?;

    let chain: Arc<dyn ChainSource> = Arc::new(LcdClient::new(
        settings.node.lcd_url.clone(),
        settings.node.timeout,
    )?);
    let store: Arc<dyn GovStore> = Arc::new(PostgresStore::new(pool));
    info!(lcd_url = %settings.node.lcd_url, "🔗 Chain node client ready");

    let gov = Arc::new(GovModule::new(
        chain.clone(),
        store.clone(),
        params_registry(&chain, &store),
    ));

    // Background refresh jobs
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let jobs = scheduler::spawn_refresh_jobs(gov.clone(), &settings.refresh, shutdown_rx);

    // Build the router
    let app = create_router(Arc::new(AppState::new(gov, store)));

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   GET  /health                        - Health check");
    info!("   POST /api/blocks                    - Process a committed block");
    info!("   POST /api/proposals/{{id}}/refresh    - Reconcile a proposal at the chain tip");
    info!("   POST /api/proposals/{{id}}/deposits   - Record a missed deposit");
    info!("   POST /api/refresh/tally             - Refresh open proposal tallies");
    info!("   POST /api/refresh/snapshots         - Refresh staking pool snapshots");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop refresh jobs once the server is down
    let _ = shutdown_tx.send(true);
    for job in jobs {
        if let Err(e) = job.await {
            error!("Refresh job ended abnormally: {}", e);
        }
    }

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Peer modules reached by param-change proposals
fn params_registry(chain: &Arc<dyn ChainSource>, store: &Arc<dyn GovStore>) -> ParamsRegistry {
    let mint = Arc::new(MintModule::new(chain.clone(), store.clone()));

    let registry = [
        Subspace::Distribution,
        Subspace::Gov,
        Subspace::Slashing,
        Subspace::Staking,
    ]
    .into_iter()
    .fold(ParamsRegistry::new(), |registry, subspace| {
        registry.register(
            subspace,
            Arc::new(ChainParamsModule::new(subspace, chain.clone(), store.clone())),
        )
    });

    registry.register(Subspace::Mint, mint.clone()).with_inflation(mint)
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gov_sync=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Initialize the database pool
async fn init_database_pool(db: &DatabaseConfig) -> anyhow::Result<deadpool_postgres::Pool> {
    use deadpool_postgres::{Config, ManagerConfig, PoolConfig, RecyclingMethod};

    let mut cfg = Config::new();
    cfg.host = Some(db.host.clone());
    cfg.port = Some(db.port);
    cfg.user = Some(db.user.clone());
    cfg.password = Some(db.password.clone());
    cfg.dbname = Some(db.database.clone());
    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    cfg.pool = Some(PoolConfig::new(db.max_pool_size));

    // Create pool with TLS support if needed
    let pool = if db.require_tls {
        let certs = rustls_native_certs::load_native_certs();
        let mut root_store = rustls::RootCertStore::empty();
        for cert in certs.certs {
            root_store.add(cert).ok();
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);

        cfg.create_pool(Some(deadpool_postgres::Runtime::Tokio1), tls)
            .map_err(|e| anyhow::anyhow!("Failed to create TLS pool: {}", e))?
    } else {
        cfg.create_pool(Some(deadpool_postgres::Runtime::Tokio1), tokio_postgres::NoTls)
            .map_err(|e| anyhow::anyhow!("Failed to create pool: {}", e))?
    };

    // Test the connection
    let client = pool
        .get()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to get pool connection: {}", e))?;

    client
        .query_one("SELECT 1 as ok", &[])
        .await
        .map_err(|e| anyhow::anyhow!("Failed to verify database connection: {}", e))?;

    info!("✅ Database connection successful (TLS: {})", db.require_tls);
    Ok(pool)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}

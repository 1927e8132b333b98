mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};
use tintaloc_geo::{CepClient, GeoResolver, JitterEstimator};
use tintaloc_scraper::{DiscoveryOptions, SearchClient, StoreDiscovery};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = tintaloc_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = tintaloc_db::PoolConfig {
        max_connections: config.db_max_connections,
        min_connections: config.db_min_connections,
        acquire_timeout_secs: config.db_acquire_timeout_secs,
    };
    let pool = tintaloc_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = tintaloc_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let cep_client = CepClient::with_base_url(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        &config.viacep_base_url,
    )?;
    let resolver = Arc::new(GeoResolver::new(cep_client));

    let search_client = SearchClient::with_base_url(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        &config.search_base_url,
    )?;
    let options = DiscoveryOptions {
        results_per_query: config.search_results_per_query,
        inter_query_delay_ms: config.search_inter_query_delay_ms,
        locale: config.search_locale.clone(),
        physical_cap: config.physical_results_cap,
        online_cap: config.online_results_cap,
        merged_cap: config.merged_results_cap,
    };
    let discovery = Arc::new(StoreDiscovery::new(
        search_client,
        Arc::clone(&resolver),
        Box::new(JitterEstimator::default()),
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        options,
    )?);

    let app = build_app(AppState {
        pool,
        resolver,
        discovery,
    });

    tracing::info!(addr = %config.bind_addr, env = %config.env, "starting server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
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

    tracing::info!("received shutdown signal, starting graceful shutdown");
}

mod api;
mod config;
mod shuffle;
mod state;
mod utils;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use api::api_router;
use config::{config_path_from_env, load_or_create_config, resolve_path, ConfigToggle, ServerConfig};
use library::{Catalog, CatalogSettings, FileSource, HttpSource, SongSource};
use parking_lot::RwLock;
use state::AppState;
use tower_http::request_id::{MakeRequestUuid, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = config_path_from_env();
    let (config, created) = load_or_create_config(&config_path)?;
    let config_store = Arc::new(RwLock::new(config.clone()));

    if created {
        info!("Created default config at {:?}", config_path);
    } else {
        info!("Loaded config from {:?}", config_path);
    }

    let port = if config.port == 0 { 3000 } else { config.port };
    let bind_addr = format!("0.0.0.0:{}", port);

    let source = song_source(&config_path, &config);
    info!("Catalog source: {}", source.describe());
    let catalog = Catalog::new(
        source,
        Arc::new(ConfigToggle::new(Arc::clone(&config_store))),
        CatalogSettings {
            local_url_template: config.local_url_template.clone(),
        },
    );
    let state = AppState {
        catalog,
        config_path,
        config: config_store,
    };

    if config.eager_init {
        state.catalog.retrieve_async(|ready| {
            if ready {
                info!("Catalog ready");
            } else {
                warn!("Initial catalog load failed; it will be retried on the next request.");
            }
        });
    } else {
        info!("Catalog loads on first request.");
    }

    if let Ok(delay_ms) = std::env::var("RAGA_START_DELAY_MS") {
        if let Ok(delay_ms) = delay_ms.parse::<u64>() {
            if delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }

    let app = Router::new()
        .nest("/api/v1", api_router(state))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on {}", bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn song_source(config_path: &std::path::Path, config: &ServerConfig) -> Arc<dyn SongSource> {
    let url = config.source_url.trim();
    if url.is_empty() {
        Arc::new(FileSource::new(resolve_path(config_path, &config.source_path)))
    } else {
        Arc::new(HttpSource::new(
            url,
            Duration::from_secs(config.source_timeout_secs),
        ))
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = match signal(SignalKind::terminate()) {
            Ok(signal) => signal,
            Err(err) => {
                warn!("Failed to install terminate signal handler: {}", err);
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {}", err);
        }
    }

    info!("Shutdown signal received.");
}

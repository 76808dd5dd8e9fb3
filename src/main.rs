//! CineSocial game room binary entrypoint wiring REST, WebSocket and storage layers.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinesocial_games_back::{
    config::AppConfig,
    dao::room_store::{MemoryRoomStore, RoomStore},
    routes,
    state::{AppState, SharedState},
};

/// Storage backend selected through `STORAGE_BACKEND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StorageBackend {
    Memory,
    Mongo,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let app_state = build_state(config);
    let app = routes::app(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

fn storage_backend() -> StorageBackend {
    match env::var("STORAGE_BACKEND").ok().as_deref().map(str::trim) {
        Some("memory") => StorageBackend::Memory,
        Some("mongo") => StorageBackend::Mongo,
        Some(other) => {
            warn!(backend = other, "unknown STORAGE_BACKEND; using memory");
            StorageBackend::Memory
        }
        None if env::var("MONGO_URI").is_ok() => StorageBackend::Mongo,
        None => StorageBackend::Memory,
    }
}

/// Build the shared state and, for external storage, spawn the supervisor that installs it.
fn build_state(config: AppConfig) -> SharedState {
    match storage_backend() {
        StorageBackend::Memory => {
            info!("using in-memory room storage");
            AppState::with_store(config, Arc::new(MemoryRoomStore::new()) as Arc<dyn RoomStore>)
        }
        StorageBackend::Mongo => mongo_state(config),
    }
}

#[cfg(feature = "mongo-store")]
fn mongo_state(config: AppConfig) -> SharedState {
    use cinesocial_games_back::{
        dao::{
            room_store::mongodb::{MongoConfig, MongoRoomStore},
            storage::StorageError,
        },
        services::storage_supervisor,
    };

    async fn connect() -> Result<Arc<dyn RoomStore>, StorageError> {
        let config = MongoConfig::from_env().await?;
        let store = MongoRoomStore::connect(config).await?;
        Ok(Arc::new(store))
    }

    info!("using MongoDB room storage; starting in degraded mode until connected");
    let state = AppState::new(config);
    tokio::spawn(storage_supervisor::run(state.clone(), connect));
    state
}

#[cfg(not(feature = "mongo-store"))]
fn mongo_state(config: AppConfig) -> SharedState {
    warn!("MongoDB support not compiled in; using in-memory room storage");
    AppState::with_store(config, Arc::new(MemoryRoomStore::new()) as Arc<dyn RoomStore>)
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

//! Wardrobe API server: apparel and outfit CRUD plus image upload.
//!
//! # Overview
//! `app` builds the axum router over an `AppState`; `run` serves it on a
//! bound listener. Handlers in `routes` validate input and map outcomes to
//! status codes, services in `services` talk to the document store and the
//! image host, and `store` owns the two collections.

pub mod config;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::future::Future;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::{ApparelService, CloudinaryHost, ImageHost, OutfitService, UploadService};
use crate::store::{Connection, Database};

pub use models::{Apparel, ApparelType, Outfit, PopulatedOutfit};

/// Services shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub apparel: ApparelService,
    pub outfits: OutfitService,
    pub uploads: UploadService,
    pub connection: Arc<Connection>,
}

impl AppState {
    pub fn new(connection: Arc<Connection>, uploads: UploadService) -> Self {
        Self {
            apparel: ApparelService::new(connection.clone()),
            outfits: OutfitService::new(connection.clone()),
            uploads,
            connection,
        }
    }

    /// State wired from process configuration. The database connection is
    /// opened lazily on the first request that needs it.
    pub fn from_config(config: &Config) -> Self {
        let host = CloudinaryHost::new(config.image_host.clone());
        Self::new(
            Arc::new(Connection::new(config.database_uri.clone())),
            UploadService::new(Arc::new(host), config.image_host.folder.clone()),
        )
    }

    /// State over a fresh in-memory database and the given image host.
    pub fn in_memory(host: Arc<dyn ImageHost>) -> Self {
        Self::with_database(Database::in_memory(), host)
    }

    pub fn with_database(database: Database, host: Arc<dyn ImageHost>) -> Self {
        Self::new(
            Arc::new(Connection::established(database)),
            UploadService::new(host, "wardrobe"),
        )
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .nest("/api", routes::api_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    serve(listener, state, std::future::pending()).await
}

/// Serve until `shutdown` resolves, then flush the database.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let connection = state.connection.clone();
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    if let Err(err) = connection.disconnect().await {
        tracing::error!(error = %err, "failed to flush database on shutdown");
    }
    Ok(())
}

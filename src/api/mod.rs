//! HTTP surface: ingest on `POST /api/data`, reads on `/api/latest` and `/api/history`.

pub mod error;
pub mod routes;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use log::info;
use tower_http::cors::CorsLayer;

use crate::config::{QueryConfig, ServerConfig};
use crate::database::SampleStore;
use crate::service::StabilityService;

pub use error::ApiError;

pub struct AppState<S> {
    pub service: Arc<StabilityService<S>>,
    pub query: QueryConfig,
}

// derive 会要求 S: Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            query: self.query.clone(),
        }
    }
}

impl<S> AppState<S> {
    pub fn new(service: Arc<StabilityService<S>>, query: QueryConfig) -> Self {
        Self { service, query }
    }
}

pub fn router<S: SampleStore + 'static>(state: AppState<S>, server: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/", get(routes::root))
        .route("/api/test", get(routes::health))
        .route("/api/data", post(routes::ingest::<S>))
        .route("/api/latest", get(routes::latest::<S>))
        .route("/api/history", get(routes::history::<S>))
        .with_state(state);

    if server.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

pub async fn serve(
    addr: SocketAddr,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

use axum::Router;
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::storage::SqliteStore;

pub mod error;
pub mod extractors;
pub mod routes;

pub use error::ApiResult;

/// Server state. Handlers open a short-lived connection per request;
/// nothing is shared or pooled.
pub struct AppState {
    pub database_path: PathBuf,
}

/// Build the full route table over the given state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/add", get(routes::add_form).post(routes::add_place))
        .route("/places", get(routes::list_places))
        .route("/edit/{id}", get(routes::edit_form).post(routes::edit_place))
        .route("/delete/{id}", post(routes::delete_place))
        .route("/toggle_visited/{id}", post(routes::toggle_visited))
        .route("/api/stats", get(routes::stats))
        .route("/stats", get(routes::stats))
        .route("/export.csv", get(routes::export_csv))
        .route("/random", get(routes::random_place))
        .route("/timeline", get(routes::timeline))
        .fallback_service(ServeDir::new("static"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(port: u16, database_path: PathBuf) -> anyhow::Result<()> {
    // Create the schema before the first request needs it
    SqliteStore::open(&database_path)?;

    let state = Arc::new(AppState { database_path });
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);
    println!("🌍 Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

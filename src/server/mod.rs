use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::report::Reporter;
use crate::store::StoreHandle;

pub mod routes;

/// Server state
pub struct AppState {
    pub reporter: Reporter,
}

pub async fn start_server(port: u16, handle: Arc<StoreHandle>) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        reporter: Reporter::new(handle),
    });

    let app = Router::new()
        .route("/summary", get(routes::get_summary))
        .route("/dashboard", get(routes::get_dashboard))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);
    println!("🌍 Summary available at http://{}/summary", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api::{self, AppState};
use crate::config::SkycastConfig;

/// Bind and serve the API plus the static dashboard bundle
pub async fn run(config: SkycastConfig) -> anyhow::Result<()> {
    let port = config.server.port;
    let state = AppState::new(config)?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api", api::router(state))
        .fallback_service(ServeDir::new("frontend/dist"))
        .layer(cors);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server running at http://localhost:{}", port);
    axum::serve(listener, app).await?;
    Ok(())
}

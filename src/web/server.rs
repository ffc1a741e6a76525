use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use log::info;

use crate::web::{handlers, AppState};

/// Bind the configured port and serve until the process is stopped
pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router.
///
/// Public so integration tests can serve it on an ephemeral port with mock
/// providers.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/translate-stream", post(handlers::translate_stream))
        .route("/health", get(handlers::health))
        .with_state(state)
}

//! Axum-based HTTP server.

use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use crate::handlers::{self, AppState};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/validate/:module",
            post(handlers::validate)
                .delete(handlers::unverify)
                .get(handlers::naming),
        )
        .route(
            "/validate/:module/verificationText",
            get(handlers::verification_text),
        )
        .route(
            "/validate/:module/groups/:title",
            get(handlers::groups_for_title),
        )
        .route("/weekly-validation", post(handlers::report_failures))
        .route("/weekly-validation/:handle", get(handlers::status))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
}

pub struct RpcServer {
    pub port: u16,
    pub state: AppState,
}

impl RpcServer {
    pub fn new(port: u16, state: AppState) -> Self {
        Self { port, state }
    }

    /// Serve until the process is shut down.
    pub async fn start(&self) -> Result<(), std::io::Error> {
        let app = router(self.state.clone());
        let addr = format!("0.0.0.0:{}", self.port);
        info!("RPC server listening on {}", addr);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await
    }
}

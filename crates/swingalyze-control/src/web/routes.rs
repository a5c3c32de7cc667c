//! Route definitions

use axum::{response::Json, routing::get, Router};
use serde::Serialize;
use std::path::Path;
use tower_http::services::ServeDir;

/// Body of the liveness probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Health {
    pub ok: bool,
}

/// Build the router: `/healthz` plus static files from `root`.
///
/// Directory requests resolve to their `index.html`; unknown paths are 404.
pub fn build_router(root: &Path) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .fallback_service(ServeDir::new(root))
}

/// GET /healthz
async fn healthz() -> Json<Health> {
    Json(Health { ok: true })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_healthz_body() {
        let response = healthz().await;
        assert_eq!(
            serde_json::to_string(&response.0).unwrap(),
            r#"{"ok":true}"#
        );
    }
}

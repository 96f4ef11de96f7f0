use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{server::AppState, storage::Storage};

/// Liveness check, reporting how many CRLs are loaded
pub async fn health_check<S: Storage>(State(state): State<AppState<S>>) -> impl IntoResponse {
    let crls = state.registry.len().await;
    Json(json!({ "status": "healthy", "crls": crls }))
}

#[cfg(test)]
pub mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::pki::crl::{CrlRegistry, RevokedSerials};
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn test_health_check() {
        let registry = Arc::new(CrlRegistry::new(MemoryStorage::new()));
        registry.upsert("ca1", &RevokedSerials::new()).await.unwrap();

        let response = health_check(State(AppState { registry })).await;
        assert_eq!(
            response.into_response().status(),
            axum::http::StatusCode::OK
        );
    }
}

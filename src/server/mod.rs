//! HTTP surface for key issuance and verification.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/health` | liveness probe |
//! | POST | `/api/generate-key` | issue a key |
//! | GET | `/api/verify?key=` | classify a key |
//! | POST | `/api/verify` | classify a key from a JSON body |
//! | POST | `/api/legacy/verify` | fixed allow-list check (only if configured) |

pub mod error;
pub mod routes;

use crate::config::KeyGateConfig;
use crate::policy::legacy::LegacyAllowList;
use crate::service::KeyService;
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Key issuance and verification.
    pub service: KeyService,
    /// Literal keys for the legacy endpoint.
    pub legacy: Arc<LegacyAllowList>,
}

impl AppState {
    /// Build handler state from a service and the legacy keys in `config`.
    pub fn new(service: KeyService, config: &KeyGateConfig) -> Self {
        Self {
            service,
            legacy: Arc::new(LegacyAllowList::new(config.legacy_keys.iter().cloned())),
        }
    }
}

/// Create the HTTP router.
pub fn router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(routes::health))
        .route("/api/generate-key", post(routes::generate_key))
        .route(
            "/api/verify",
            get(routes::verify_query).post(routes::verify_body),
        );

    if !state.legacy.is_empty() {
        router = router.route(
            "/api/legacy/verify",
            post(routes::legacy_verify).fallback(routes::method_not_allowed),
        );
    }

    router.with_state(state)
}

/// Serve the router on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

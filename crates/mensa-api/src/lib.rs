//! # mensa-api — HTTP Surface of the Menu Compliance Engine
//!
//! The dashboard's observed contract, reproduced over the engine:
//!
//! | Route                             | Module               | Purpose                        |
//! |-----------------------------------|----------------------|--------------------------------|
//! | `GET/POST /v1/checks`             | [`routes::checks`]   | List / run checks              |
//! | `GET /v1/checks/{id}`             | [`routes::checks`]   | Check with aggregate counters  |
//! | `GET /v1/checks/{id}/results`     | [`routes::checks`]   | Ordered results with evidence  |
//! | `POST /v1/checks/{id}/rerun`      | [`routes::checks`]   | Atomic re-run in place         |
//! | `GET /v1/stats`                   | [`routes::checks`]   | Dashboard aggregates           |
//! | `PUT /v1/menus`                   | [`routes::menus`]    | Parsed-menu deposit            |
//! | `GET /v1/catalog[...]`            | [`routes::catalog`]  | Catalog review surface         |
//! | `GET/POST/PUT/DELETE /v1/rules`   | [`routes::rules`]    | Rules CRUD                     |
//! | `GET /openapi.json`               | [`openapi`]          | Generated OpenAPI spec         |
//! | `GET /health/*`                   | here                 | Liveness / readiness probes    |

pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::checks::router())
        .merge(routes::menus::router())
        .merge(routes::catalog::router())
        .merge(routes::rules::router())
        .merge(openapi::router());

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new()
        .merge(api)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the stores are reachable.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    // Touch each store through its read path; a poisoned or deadlocked
    // store surfaces here instead of on the first user request.
    let _ = state.catalog.len();
    let _ = state.rules.list(true).len();
    let _ = state.checks.stats();
    (StatusCode::OK, "ready")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn liveness_is_ok() {
        let app = app(AppState::new());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/health/liveness")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_is_ok_on_fresh_state() {
        let app = app(AppState::new());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/health/readiness")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn openapi_json_is_served() {
        let app = app(AppState::new());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = app(AppState::new());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/v1/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

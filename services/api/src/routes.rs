use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use hostel_ops::portfolio::{portfolio_router, OwnerRepository, PortfolioService};

/// Infra endpoints plus the owner-scoped portfolio API.
pub(crate) fn with_portfolio_routes<S>(service: Arc<PortfolioService<S>>) -> axum::Router
where
    S: OwnerRepository + 'static,
{
    portfolio_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use hostel_ops::portfolio::InMemoryOwnerRepository;
    use tower::ServiceExt;

    fn router() -> axum::Router {
        let repository = Arc::new(InMemoryOwnerRepository::default());
        let service = Arc::new(PortfolioService::new(repository));
        with_portfolio_routes(service)
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn dashboard_route_is_mounted() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/owners/owner-1/dashboard?today=2025-01-20")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        // No owner seeded: the portfolio API answers, with not-found.
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

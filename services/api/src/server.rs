use crate::cli::ServeArgs;
use crate::demo::seed_demo_portfolio;
use crate::infra::AppState;
use crate::routes::with_portfolio_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use hostel_ops::config::AppConfig;
use hostel_ops::error::AppError;
use hostel_ops::portfolio::{InMemoryOwnerRepository, PortfolioService};
use hostel_ops::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryOwnerRepository::default());
    let portfolio_service = Arc::new(
        PortfolioService::new(repository)
            .with_activity_feed_limit(config.report.activity_feed_limit),
    );

    if args.seed_demo {
        let today = Local::now().date_naive();
        let seeded = seed_demo_portfolio(&portfolio_service, today)?;
        info!(owner_id = %seeded.owner_id, "demo portfolio seeded");
    }

    let app = with_portfolio_routes(portfolio_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "hostel portfolio service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

use crate::cli::ServeArgs;
use crate::infra::{build_tables, AppState};
use crate::routes::with_calculator_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use sip_estimator::config::AppConfig;
use sip_estimator::error::AppError;
use sip_estimator::pricing::CostCalculator;
use sip_estimator::telemetry;
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

    let tables = build_tables(&args.tables, &config.tables)?;
    let effective_from = tables.effective_from;
    let calculator = Arc::new(CostCalculator::new(tables));

    let app = with_calculator_routes(calculator)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, %effective_from, "sip cost estimator ready");

    axum::serve(listener, app).await?;
    Ok(())
}

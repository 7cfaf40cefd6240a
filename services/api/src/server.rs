use crate::cli::ServeArgs;
use crate::infra::{build_routing_service, AppState};
use crate::routes::with_lead_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lead_router::config::AppConfig;
use lead_router::error::AppError;
use lead_router::routing::SystemClock;
use lead_router::telemetry;
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
    if let Some(roster) = args.roster.take() {
        config.routing.roster = Some(roster);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let clock = SystemClock::new(config.routing.clock_zone);
    let routing_service = Arc::new(build_routing_service(
        clock,
        config.routing.roster.as_deref(),
    )?);

    let app = with_lead_routes(routing_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        clock_zone = ?config.routing.clock_zone,
        %addr,
        "lead router ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

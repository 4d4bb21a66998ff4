use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rent_estimator::config::AppConfig;
use rent_estimator::error::AppError;
use rent_estimator::estimate::{EstimateService, ModelGateway};
use rent_estimator::features::FeatureMapper;
use rent_estimator::location::LocationCatalog;
use rent_estimator::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.geo_data.take() {
        config.data.geo_data_path = path;
    }
    if let Some(endpoint) = args.model_endpoint.take() {
        config.model.endpoint = Some(endpoint);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let catalog = Arc::new(LocationCatalog::load(
        &config.data.geo_data_path,
        config.location_defaults.clone(),
    ));
    let mapper = FeatureMapper::standard()?;
    let gateway = ModelGateway::from_config(&config.model)?;
    if !gateway.is_configured() {
        warn!("MODEL_ENDPOINT not set; estimates will report the model as unavailable");
    }

    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        catalog: catalog.clone(),
    };

    let estimate_service = Arc::new(EstimateService::new(
        catalog.clone(),
        mapper,
        Arc::new(gateway),
    ));

    let app = with_service_routes(catalog, estimate_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "rent estimator ready");

    axum::serve(listener, app).await?;
    Ok(())
}

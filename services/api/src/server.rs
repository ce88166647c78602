use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAlertFeed, InMemoryScenarioStore};
use crate::routes::with_allocation_routes;
use aidvantage::allocation::AllocationService;
use aidvantage::config::AppConfig;
use aidvantage::data::{fixtures, Dataset};
use aidvantage::error::AppError;
use aidvantage::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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

    telemetry::init(&config.telemetry, config.environment)?;

    let dataset = Dataset::from_csv_paths(
        config.data.counties_csv.as_deref(),
        config.data.resources_csv.as_deref(),
    )?;
    dataset.validate()?;
    info!(
        counties = dataset.counties.len(),
        resources = dataset.resources.len(),
        max_county_share_pct = config.allocation.max_county_share_pct,
        "dataset loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        dataset: Arc::new(dataset.clone()),
        alerts: Arc::new(InMemoryAlertFeed::seeded(fixtures::alerts())),
    };

    let store = Arc::new(InMemoryScenarioStore::default());
    let allocation_service = Arc::new(AllocationService::new(
        store,
        dataset,
        config.allocation.clone(),
    ));

    let app = with_allocation_routes(allocation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "aidvantage dashboard api ready");

    axum::serve(listener, app).await?;
    Ok(())
}

use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySelectionStore};
use crate::routes::with_classification_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use export_matrix::classification::{ClassificationService, CriterionCatalog};
use export_matrix::config::AppConfig;
use export_matrix::error::AppError;
use export_matrix::telemetry;
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

    let catalog = Arc::new(CriterionCatalog::load(&config.rubric)?);
    info!(
        version = %catalog.version(),
        criteria = catalog.list_criteria().len(),
        maximum_score = catalog.maximum_possible_score(),
        "rubric loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemorySelectionStore::default());
    let classification_service = Arc::new(ClassificationService::new(store, catalog));

    let app = with_classification_routes(classification_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "export readiness matrix ready");

    axum::serve(listener, app).await?;
    Ok(())
}

use crate::cli::ServeArgs;
use crate::infra::{build_stack, AppState};
use crate::routes::with_hr_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hr_records::config::AppConfig;
use hr_records::error::AppError;
use hr_records::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(root) = args.upload_dir.take() {
        config.uploads.root = root;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    std::fs::create_dir_all(&config.uploads.root).map_err(|source| AppError::UploadRoot {
        path: config.uploads.root.clone(),
        source,
    })?;
    let stack = build_stack(&config.auth, &config.uploads);

    let app = with_hr_routes(&stack, &config.uploads.root)
        .layer(Extension(app_state))
        .layer(prometheus_layer)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Bind { addr, source })?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        uploads = %config.uploads.root.display(),
        "hr records service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

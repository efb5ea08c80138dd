use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCustomerRepository, InMemoryLoanRepository};
use crate::routes::with_lending_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use creditline::config::AppConfig;
use creditline::error::AppError;
use creditline::lending::{LedgerImporter, LendingService};
use creditline::telemetry;
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

    let customers = Arc::new(InMemoryCustomerRepository::default());
    let loans = Arc::new(InMemoryLoanRepository::default());
    let service = Arc::new(LendingService::new(
        customers.clone(),
        loans.clone(),
        config.policy(),
    ));

    if let Some(path) = args.customers_csv.take() {
        let report = LedgerImporter::customers_from_path(&path, &*customers)?;
        info!(
            created = report.created,
            updated = report.updated,
            rejected = report.rejected,
            "customer ledger seeded"
        );
        service.advance_sequences(report.highest_id, 0);
    }

    if let Some(path) = args.loans_csv.take() {
        let report = LedgerImporter::loans_from_path(&path, &*customers, &*loans)?;
        info!(
            created = report.created,
            updated = report.updated,
            skipped = report.skipped_unknown_customer,
            rejected = report.rejected,
            "loan ledger seeded"
        );
        service.advance_sequences(0, report.highest_id);
    }

    let app = with_lending_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loan eligibility service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

pub mod middleware;

pub use middleware::MetricsMiddleware;

use std::sync::{Arc, OnceLock};

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

use crate::config::AppConfig;
use crate::entities::v1::permissions::Action;

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

const HTTP_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0];
const DB_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0];

/// Process wide Prometheus recorder.
///
/// The recorder can only be installed once per process; every `AppMetrics`
/// shares the same handle. When another recorder already owns the global slot
/// the handle still renders, it just stays empty.
#[derive(Clone)]
pub struct AppMetrics {
    prometheus_handle: Arc<PrometheusHandle>,
}

impl AppMetrics {
    pub fn new() -> Self {
        Self::with_config(None)
    }

    pub fn with_config(config: Option<&AppConfig>) -> Self {
        let handle = PROMETHEUS_HANDLE.get_or_init(|| match Self::install(config) {
            Ok(handle) => handle,
            Err(e) => {
                ::tracing::warn!(error = %e, "Prometheus recorder not installed");
                PrometheusBuilder::new().build_recorder().handle()
            }
        });

        Self {
            prometheus_handle: Arc::new(handle.clone()),
        }
    }

    fn install(config: Option<&AppConfig>) -> Result<PrometheusHandle, BuildError> {
        let mut builder = PrometheusBuilder::new();

        if let Some(config) = config {
            builder = builder
                .add_global_label("service", config.app.name.clone())
                .add_global_label("version", config.app.version.clone())
                .add_global_label("environment", config.app.environment.clone());
        }

        let handle = builder
            .set_buckets_for_metric(
                Matcher::Full("http_requests_duration_seconds".to_string()),
                HTTP_BUCKETS,
            )?
            .set_buckets_for_metric(
                Matcher::Full("database_operations_duration_seconds".to_string()),
                DB_BUCKETS,
            )?
            .install_recorder()?;

        Self::describe_metrics();

        Ok(handle)
    }

    fn describe_metrics() {
        describe_counter!("http_requests_total", "Total number of HTTP requests");
        describe_histogram!(
            "http_requests_duration_seconds",
            "HTTP request duration in seconds"
        );
        describe_gauge!(
            "http_requests_in_flight",
            "Number of HTTP requests currently being processed"
        );

        describe_counter!(
            "database_operations_total",
            "Total number of database operations by name and outcome"
        );
        describe_histogram!(
            "database_operations_duration_seconds",
            "Database operation duration in seconds"
        );

        describe_counter!(
            "permission_checks_total",
            "Authorization checks by action and outcome"
        );
        describe_counter!(
            "cascade_deleted_rows_total",
            "Rows removed by module and submodule cascades"
        );

        describe_counter!("auth_login_attempts_total", "Total number of login attempts");
    }

    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        counter!(
            "http_requests_total",
            "method" => method.to_string(),
            "path" => path.to_string(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            "http_requests_duration_seconds",
            "method" => method.to_string(),
            "path" => path.to_string()
        )
        .record(duration_secs);
    }

    pub fn http_request_start(&self) {
        gauge!("http_requests_in_flight").increment(1.0);
    }

    pub fn http_request_end(&self) {
        gauge!("http_requests_in_flight").decrement(1.0);
    }

    pub fn record_db_operation(&self, operation: &str, success: bool, duration_secs: f64) {
        counter!(
            "database_operations_total",
            "operation" => operation.to_string(),
            "success" => success.to_string()
        )
        .increment(1);
        histogram!(
            "database_operations_duration_seconds",
            "operation" => operation.to_string()
        )
        .record(duration_secs);
    }

    pub fn record_permission_check(&self, action: Action, granted: bool) {
        counter!(
            "permission_checks_total",
            "action" => action.as_str(),
            "granted" => granted.to_string()
        )
        .increment(1);
    }

    /// `kind` is one of `submodules`, `permissions` or `assignments`
    pub fn record_cascade(&self, kind: &'static str, rows: u64) {
        counter!("cascade_deleted_rows_total", "kind" => kind).increment(rows);
    }

    pub fn record_login_attempt(&self, success: bool) {
        counter!("auth_login_attempts_total", "success" => success.to_string()).increment(1);
    }

    pub fn render(&self) -> String {
        self.prometheus_handle.render()
    }
}

impl Default for AppMetrics {
    fn default() -> Self {
        Self::new()
    }
}

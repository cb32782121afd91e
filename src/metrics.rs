//! Prometheus metrics for calculation volume and latency.
//!
//! Recording is a no-op until a recorder is installed with
//! [`install_prometheus`], so library callers pay nothing by default.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Calculation latency metric name.
pub const METRIC_CALCULATION_LATENCY: &str = "calculation_latency_ms";
/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// Calculations counter metric name.
pub const METRIC_CALCULATIONS: &str = "calculations_total";
/// Degenerate (incomplete input) calculations counter metric name.
pub const METRIC_DEGENERATE_CALCULATIONS: &str = "degenerate_calculations_total";
/// Numeric domain errors counter metric name.
pub const METRIC_DOMAIN_ERRORS: &str = "domain_errors_total";
/// Requests with validation issues counter metric name.
pub const METRIC_VALIDATION_FAILURES: &str = "validation_failures_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_CALCULATION_LATENCY,
        "Allocation and profit calculation latency in milliseconds"
    );
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );

    describe_counter!(METRIC_CALCULATIONS, "Total number of calculations performed");
    describe_counter!(
        METRIC_DEGENERATE_CALCULATIONS,
        "Calculations answered with zeros because the input was incomplete"
    );
    describe_counter!(
        METRIC_DOMAIN_ERRORS,
        "Calculations rejected for a non-positive effective multiplier"
    );
    describe_counter!(
        METRIC_VALIDATION_FAILURES,
        "Requests that carried at least one validation issue"
    );

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and describe metrics.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, endpoint: &'static str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint).record(latency_ms);
}

/// Increment calculation counters.
pub fn inc_calculations(degenerate: bool) {
    counter!(METRIC_CALCULATIONS).increment(1);
    if degenerate {
        counter!(METRIC_DEGENERATE_CALCULATIONS).increment(1);
    }
}

/// Increment domain error counter.
pub fn inc_domain_errors() {
    counter!(METRIC_DOMAIN_ERRORS).increment(1);
}

/// Increment validation failure counter.
pub fn inc_validation_failures() {
    counter!(METRIC_VALIDATION_FAILURES).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name).record(self.elapsed_ms());
    }
}

/// Create a latency timer for a calculation.
pub fn timer_calculation() -> LatencyTimer {
    LatencyTimer::new(METRIC_CALCULATION_LATENCY)
}

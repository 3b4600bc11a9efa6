use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Global metrics instance.
pub static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Metrics collector for the ledger engine.
#[derive(Debug, Clone)]
pub struct Metrics {
    initialized: bool,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self { initialized: true }
    }

    pub fn record_credit_applied(&self, credit_type: &str, currency: &str) {
        counter!("ledger_credits_applied_total", "credit_type" => credit_type.to_string(), "currency" => currency.to_string()).increment(1);
    }

    pub fn record_debit_applied(&self, currency: &str, entries_consumed: u64) {
        counter!("ledger_debits_applied_total", "currency" => currency.to_string()).increment(1);
        histogram!("ledger_debit_entries_consumed").record(entries_consumed as f64);
    }

    pub fn record_debit_rejected(&self, currency: &str) {
        counter!("ledger_debits_rejected_total", "currency" => currency.to_string(), "reason" => "insufficient_credit").increment(1);
    }

    pub fn record_duplicate_request(&self, kind: &str) {
        counter!("ledger_duplicate_requests_total", "kind" => kind.to_string()).increment(1);
    }

    pub fn record_ledger_write_latency(&self, duration_ms: f64) {
        histogram!("ledger_write_duration_ms").record(duration_ms);
    }

    pub fn record_balance_query_latency(&self, duration_ms: f64) {
        histogram!("ledger_balance_query_duration_ms").record(duration_ms);
    }

    pub fn set_tracked_accounts(&self, count: i64) {
        gauge!("ledger_tracked_accounts").set(count as f64);
    }

    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_ms: f64) {
        counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string(), "status" => status.to_string()).increment(1);
        histogram!("http_request_duration_ms", "method" => method.to_string(), "path" => path.to_string()).record(duration_ms);
    }
}

/// Timer for measuring operation latency.
pub struct LatencyTimer {
    start: Instant,
}

impl LatencyTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for LatencyTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Initializes the metrics system and returns the Prometheus handle.
pub fn init_metrics() -> PrometheusHandle {
    let handle = METRICS_HANDLE.get_or_init(|| {
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .expect("Failed to install Prometheus recorder");

        describe_metrics();
        handle
    });

    METRICS.get_or_init(Metrics::new);

    handle.clone()
}

/// Describes all metrics for Prometheus.
fn describe_metrics() {
    describe_counter!("ledger_credits_applied_total", Unit::Count, "Total credit grants applied");
    describe_counter!("ledger_debits_applied_total", Unit::Count, "Total debits applied");
    describe_counter!("ledger_debits_rejected_total", Unit::Count, "Total debits rejected");
    describe_counter!("ledger_duplicate_requests_total", Unit::Count, "Total duplicate requests ignored");

    describe_histogram!("ledger_debit_entries_consumed", Unit::Count, "Credit entries consumed per debit");
    describe_histogram!("ledger_write_duration_ms", Unit::Milliseconds, "Ledger write latency in milliseconds");
    describe_histogram!("ledger_balance_query_duration_ms", Unit::Milliseconds, "Balance query latency in milliseconds");

    describe_gauge!("ledger_tracked_accounts", Unit::Count, "Account slots tracked by the registry");

    describe_counter!("http_requests_total", Unit::Count, "Total HTTP requests");
    describe_histogram!("http_request_duration_ms", Unit::Milliseconds, "HTTP request latency in milliseconds");
}

/// Returns the global metrics instance.
pub fn get_metrics() -> &'static Metrics {
    METRICS.get_or_init(Metrics::new)
}

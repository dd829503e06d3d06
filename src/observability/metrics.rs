//! Fault metrics and Prometheus exposition.
//!
//! # Metrics
//! - `faults_handled_total` (counter): tracked failures normalized, by fault and status
//! - `faults_propagated_total` (counter): failures returned to the host, by fault and reason
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels use the fault's short type name

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_handled(fault: &'static str, status: u16) {
    ::metrics::counter!(
        "faults_handled_total",
        "fault" => fault,
        "status" => status.to_string()
    )
    .increment(1);
}

/// `reason` is one of `untracked`, `response_started`, `write_failed`.
pub fn record_propagated(fault: &'static str, reason: &'static str) {
    ::metrics::counter!(
        "faults_propagated_total",
        "fault" => fault,
        "reason" => reason
    )
    .increment(1);
}

//! Prometheus metrics for the badge service.
//!
//! [`RpcMetrics`] owns a dedicated [`Registry`] that `GET /metrics` encodes
//! into the Prometheus text exposition format.

use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry, Encoder,
    IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

pub struct RpcMetrics {
    pub registry: Registry,

    /// Successful enrollments.
    pub enrollments: IntCounter,
    /// Enrollments refused for a client-side reason (rejected credential,
    /// blacklist, bad input).
    pub enrollments_rejected: IntCounter,
    pub unenrollments: IntCounter,
    /// Probation warnings sent, delivered or not.
    pub warnings_sent: IntCounter,
    pub removals: IntCounter,
    /// Probation reports by outcome (`valid`, `failed`).
    pub probation_reports: IntCounterVec,
}

impl RpcMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let enrollments = register_int_counter_with_registry!(
            Opts::new("badge_enrollments_total", "Identities enrolled into a module"),
            registry
        )?;
        let enrollments_rejected = register_int_counter_with_registry!(
            Opts::new(
                "badge_enrollments_rejected_total",
                "Enrollment requests refused for a client-side reason"
            ),
            registry
        )?;
        let unenrollments = register_int_counter_with_registry!(
            Opts::new("badge_unenrollments_total", "Identities that unverified themselves"),
            registry
        )?;
        let warnings_sent = register_int_counter_with_registry!(
            Opts::new("badge_probation_warnings_total", "Probation warnings sent"),
            registry
        )?;
        let removals = register_int_counter_with_registry!(
            Opts::new("badge_removals_total", "Memberships removed after repeated failures"),
            registry
        )?;
        let probation_reports = register_int_counter_vec_with_registry!(
            Opts::new("badge_probation_reports_total", "Failure-count reports by outcome"),
            &["outcome"],
            registry
        )?;

        Ok(Self {
            registry,
            enrollments,
            enrollments_rejected,
            unenrollments,
            warnings_sent,
            removals,
            probation_reports,
        })
    }

    /// Text exposition of every registered metric.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_registered_counters() {
        let metrics = RpcMetrics::new().unwrap();
        metrics.enrollments.inc();
        metrics.probation_reports.with_label_values(&["failed"]).inc();
        let text = metrics.render().unwrap();
        assert!(text.contains("badge_enrollments_total 1"));
        assert!(text.contains("badge_probation_reports_total{outcome=\"failed\"} 1"));
    }
}

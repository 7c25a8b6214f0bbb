//! # Metrics
//!
//! Prometheus metrics for provisioning runs.

use anyhow::Result;
use prometheus::{Encoder, Histogram, IntCounter, IntCounterVec, Registry, TextEncoder};
use std::sync::LazyLock;

/// Global Prometheus metrics registry
pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static RUNS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "hive_provisioner_runs_total",
        "Total number of provisioning runs (attempts)",
    )
    .expect("Failed to create RUNS_TOTAL metric - this should never happen")
});

static RUN_FAILURES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "hive_provisioner_run_failures_total",
            "Total number of failed provisioning runs by failure reason",
        ),
        &["reason"],
    )
    .expect("Failed to create RUN_FAILURES_TOTAL metric - this should never happen")
});

static PIPELINE_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "hive_provisioner_pipeline_duration_seconds",
            "Duration of helm template | oc apply pipelines in seconds",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
    )
    .expect("Failed to create PIPELINE_DURATION metric - this should never happen")
});

/// Register all metrics with the Prometheus registry
///
/// Metrics that are already registered are skipped, so this can be called more than once.
#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn register_metrics() -> Result<()> {
    let collectors: [Box<dyn prometheus::core::Collector>; 3] = [
        Box::new(RUNS_TOTAL.clone()),
        Box::new(RUN_FAILURES_TOTAL.clone()),
        Box::new(PIPELINE_DURATION.clone()),
    ];
    for collector in collectors {
        match REGISTRY.register(collector) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Render the registry in the Prometheus text exposition format
pub fn gather_text() -> Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

pub fn increment_runs_total() {
    RUNS_TOTAL.inc();
}

pub fn increment_run_failures(reason: &str) {
    RUN_FAILURES_TOTAL.with_label_values(&[reason]).inc();
}

pub fn observe_pipeline_duration(duration: f64) {
    PIPELINE_DURATION.observe(duration);
}

//! Prometheus counters for the report pipeline.

use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct FailureLabels {
    pub kind: String,
}

pub struct Metrics {
    registry: Registry,
    reports_generated: Counter,
    report_failures: Family<FailureLabels, Counter>,
    persist_failures: Counter,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix("ripple");

        let reports_generated = Counter::default();
        registry.register(
            "reports_generated",
            "Weekly executive reports returned to callers",
            reports_generated.clone(),
        );

        let report_failures = Family::<FailureLabels, Counter>::default();
        registry.register(
            "report_failures",
            "Report requests that ended in an error, by error kind",
            report_failures.clone(),
        );

        let persist_failures = Counter::default();
        registry.register(
            "report_persist_failures",
            "Generated reports that could not be saved",
            persist_failures.clone(),
        );

        Self {
            registry,
            reports_generated,
            report_failures,
            persist_failures,
        }
    }

    pub fn report_generated(&self, persisted: bool) {
        self.reports_generated.inc();
        if !persisted {
            self.persist_failures.inc();
        }
    }

    pub fn report_failed(&self, kind: &str) {
        self.report_failures
            .get_or_create(&FailureLabels {
                kind: kind.to_string(),
            })
            .inc();
    }

    /// OpenMetrics text exposition.
    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        encode(&mut out, &self.registry)?;
        Ok(out)
    }
}

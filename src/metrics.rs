//! Duration-sample emission (§6 Emitted metrics). The metric emission
//! backend itself is an external collaborator (§1); this module only
//! computes the sample and hands it to whatever sink the host registers.

use std::time::Duration;

/// The five lifecycle-derived timing samples the engine emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricName {
    BrowserLoaded,
    BrowserDomContentLoaded,
    BrowserFirstPaint,
    BrowserFirstContentfulPaint,
    BrowserFirstMeaningfulPaint,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::BrowserLoaded => "BrowserLoaded",
            MetricName::BrowserDomContentLoaded => "BrowserDOMContentLoaded",
            MetricName::BrowserFirstPaint => "BrowserFirstPaint",
            MetricName::BrowserFirstContentfulPaint => "BrowserFirstContentfulPaint",
            MetricName::BrowserFirstMeaningfulPaint => "BrowserFirstMeaningfulPaint",
        }
    }

    /// Maps a `Page.lifecycleEvent` name to the metric it feeds, if any.
    pub fn for_lifecycle_event(name: &str) -> Option<Self> {
        match name {
            "load" => Some(MetricName::BrowserLoaded),
            "DOMContentLoaded" => Some(MetricName::BrowserDomContentLoaded),
            "firstPaint" => Some(MetricName::BrowserFirstPaint),
            "firstContentfulPaint" => Some(MetricName::BrowserFirstContentfulPaint),
            "firstMeaningfulPaint" => Some(MetricName::BrowserFirstMeaningfulPaint),
            _ => None,
        }
    }
}

/// A single duration sample, tagged the way the active script's scope tags
/// and (optionally) the frame URL would be serialized by the metrics backend.
#[derive(Debug, Clone)]
pub struct Sample {
    pub name: MetricName,
    pub duration: Duration,
    pub tags: Vec<(String, String)>,
    pub url: Option<String>,
}

/// Narrow interface onto the out-of-scope metric emission backend.
pub trait MetricsSink: Send + Sync {
    fn emit(&self, sample: Sample);
}

/// A sink that only logs samples via `tracing`, used when the host doesn't
/// wire up a real backend (and in tests).
#[derive(Debug, Default)]
pub struct TracingMetricsSink;

impl MetricsSink for TracingMetricsSink {
    fn emit(&self, sample: Sample) {
        tracing::debug!(
            metric = sample.name.as_str(),
            duration_ms = sample.duration.as_millis() as u64,
            url = sample.url.as_deref().unwrap_or(""),
            "metric sample"
        );
    }
}

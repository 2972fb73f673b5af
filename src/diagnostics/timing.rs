use serde::Serialize;

/// Wall-clock time spent per phase, in milliseconds.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub generate_ms: f64,
    pub validate_ms: f64,
    pub total_ms: f64,
}

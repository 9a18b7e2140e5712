use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Dataset, LogScalePolicy, ScaleMode};

/// Time and value extent of the chart.
///
/// `None` stands for "no samples": an empty dataset leaves the time bounds
/// and the linear maximum undefined, and callers draw nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub min: f64,
    pub max: Option<f64>,
}

impl ChartRange {
    /// Derives the extent of `dataset` under `mode`.
    ///
    /// The baseline is always `[0, max(values)]` over `[min(t), max(t)]`.
    /// Logarithmic mode then replaces the value bounds with the policy floor
    /// and ceiling and the end with the policy horizon.
    pub fn compute(dataset: &Dataset, mode: ScaleMode, log_policy: &LogScalePolicy) -> Self {
        let (start, end) = match dataset.time_extent() {
            Some((s, e)) => (Some(s), Some(e)),
            None => (None, None),
        };
        let mut range = Self {
            start,
            end,
            min: 0.0,
            max: dataset.max_value(),
        };

        if mode == ScaleMode::Logarithmic {
            let (floor, ceiling) = log_policy.bounds();
            range.min = floor;
            range.max = Some(ceiling);
            range.end = log_policy.horizon.resolve(range.start);
        }
        range
    }

    /// True when both axes have a defined extent.
    pub fn is_drawable(&self) -> bool {
        self.start.is_some() && self.end.is_some() && self.max.is_some()
    }

    /// Time bounds as epoch milliseconds.
    pub fn time_domain_millis(&self) -> Option<(f64, f64)> {
        Some((
            self.start?.timestamp_millis() as f64,
            self.end?.timestamp_millis() as f64,
        ))
    }

    pub fn value_domain(&self) -> Option<(f64, f64)> {
        Some((self.min, self.max?))
    }
}

/// Stable identity of a tick: its domain value, not its index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TickKey {
    /// Epoch milliseconds.
    Time(i64),
    /// Bit pattern of the tick value.
    Value(u64),
}

impl TickKey {
    pub fn time(t: DateTime<Utc>) -> Self {
        Self::Time(t.timestamp_millis())
    }

    pub fn value(v: f64) -> Self {
        // -0.0 and 0.0 are the same tick
        let v = if v == 0.0 { 0.0 } else { v };
        Self::Value(v.to_bits())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisEdge {
    Left,
    Bottom,
}

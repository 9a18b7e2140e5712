use chrono::{DateTime, Duration as ChronoDuration, Utc};
use chrono_tz::Tz;
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::Viewport;

/// Smallest value floor accepted for a logarithmic value axis.
pub const MIN_LOG_FLOOR: f64 = 1e-12;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Margins {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::new(100.0, 100.0, 120.0, 100.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickLengths {
    pub x: f32,
    pub y: f32,
    /// Used for unlabeled log ticks under [`MinorTickPolicy::Shortened`].
    pub minor: f32,
}

impl Default for TickLengths {
    fn default() -> Self {
        Self {
            x: 5.0,
            y: 5.0,
            minor: 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelDistance {
    pub x: f32,
    pub y: f32,
}

impl Default for LabelDistance {
    fn default() -> Self {
        Self { x: 10.0, y: 10.0 }
    }
}

/// How value-axis tick labels are abbreviated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ValueLabelFormat {
    /// `15k`, `42M`: whole thousands from 1e4, whole millions from 1e7.
    Compact,
    /// `€1.6bn`, `€2.5m`, `€12.0k`, `€950`.
    Currency { symbol: String },
}

impl Default for ValueLabelFormat {
    fn default() -> Self {
        Self::Compact
    }
}

/// Treatment of log-axis ticks that are not a power of the base.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinorTickPolicy {
    /// Full-length mark, empty label.
    #[default]
    BlankLabel,
    /// Mark of `TickLengths::minor`, empty label.
    Shortened,
}

/// End of the time axis while the value axis is logarithmic.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum LogHorizon {
    /// A known deadline.
    Fixed(DateTime<Utc>),
    /// A window of fixed length after the earliest sample.
    AfterStart { seconds: i64 },
}

impl LogHorizon {
    pub fn resolve(&self, start: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
        match *self {
            Self::Fixed(at) => Some(at),
            Self::AfterStart { seconds } => start
                .zip(ChronoDuration::try_seconds(seconds))
                .and_then(|(s, window)| s.checked_add_signed(window)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogScalePolicy {
    pub floor: f64,
    pub ceiling: f64,
    pub horizon: LogHorizon,
}

impl LogScalePolicy {
    /// Floor forced positive, ceiling forced above the floor.
    pub fn bounds(&self) -> (f64, f64) {
        let floor = if self.floor.is_finite() {
            self.floor.max(MIN_LOG_FLOOR)
        } else {
            MIN_LOG_FLOOR
        };
        let ceiling = if self.ceiling.is_finite() && self.ceiling > floor {
            self.ceiling
        } else {
            floor * 10.0
        };
        (floor, ceiling)
    }
}

impl Default for LogScalePolicy {
    fn default() -> Self {
        Self {
            floor: 1e5,
            ceiling: 1.6e9,
            horizon: LogHorizon::AfterStart {
                seconds: 8 * 86_400,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesOptions {
    pub line: bool,
    pub points: bool,
    pub point_radius: f32,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            line: true,
            points: false,
            point_radius: 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoteConfig {
    pub y: f32,
    pub height: f32,
}

impl Default for NoteConfig {
    fn default() -> Self {
        Self {
            y: 30.0,
            height: 70.0,
        }
    }
}

/// Every tunable of the engine. All fields fall back to defaults when
/// missing from a config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub margins: Margins,
    pub margins_compact: Margins,
    pub compact_width_threshold: f32,
    pub tick_lengths: TickLengths,
    pub axis_label_distance: LabelDistance,
    pub value_labels: ValueLabelFormat,
    pub minor_ticks: MinorTickPolicy,
    pub log_scale: LogScalePolicy,
    pub series: SeriesOptions,
    pub note: NoteConfig,
    pub transition_ms: u64,
    pub poll_interval_ms: u64,
    pub label_timezone: Tz,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            margins: Margins::default(),
            margins_compact: Margins::new(60.0, 20.0, 120.0, 80.0),
            compact_width_threshold: 600.0,
            tick_lengths: TickLengths::default(),
            axis_label_distance: LabelDistance::default(),
            value_labels: ValueLabelFormat::default(),
            minor_ticks: MinorTickPolicy::default(),
            log_scale: LogScalePolicy::default(),
            series: SeriesOptions::default(),
            note: NoteConfig::default(),
            transition_ms: 200,
            poll_interval_ms: 300_000,
            label_timezone: chrono_tz::UTC,
        }
    }
}

impl ChartConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).wrap_err("invalid chart config")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Picks the compact margin preset below the width threshold.
    pub fn margins_for(&self, viewport: Viewport) -> Margins {
        if viewport.width < self.compact_width_threshold {
            self.margins_compact
        } else {
            self.margins
        }
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = ChartConfig::from_json_str(
            r#"{
                "value_labels": { "Currency": { "symbol": "€" } },
                "minor_ticks": "Shortened",
                "log_scale": {
                    "floor": 1e5,
                    "ceiling": 2e9,
                    "horizon": { "Fixed": "2015-06-30T22:00:00Z" }
                },
                "label_timezone": "Europe/Athens"
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.value_labels,
            ValueLabelFormat::Currency {
                symbol: "€".to_string()
            }
        );
        assert_eq!(config.minor_ticks, MinorTickPolicy::Shortened);
        assert_eq!(
            config.log_scale.horizon,
            LogHorizon::Fixed(Utc.with_ymd_and_hms(2015, 6, 30, 22, 0, 0).unwrap())
        );
        assert_eq!(config.label_timezone, chrono_tz::Europe::Athens);
        assert_eq!(config.margins, Margins::default());
        assert_eq!(config.transition_ms, 200);
        assert_eq!(config.poll_interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_log_bounds_stay_positive() {
        let policy = LogScalePolicy {
            floor: -4.0,
            ceiling: 0.0,
            ..LogScalePolicy::default()
        };
        let (floor, ceiling) = policy.bounds();
        assert!(floor > 0.0);
        assert!(ceiling > floor);
    }

    #[test]
    fn test_compact_margins_below_threshold() {
        let config = ChartConfig::default();
        assert_eq!(
            config.margins_for(Viewport::new(400.0, 300.0)),
            config.margins_compact
        );
        assert_eq!(
            config.margins_for(Viewport::new(1200.0, 800.0)),
            config.margins
        );
    }
}

use chrono::{DateTime, Utc};
use eyre::eyre;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One sample of the monitored metric.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl DataPoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Samples in feed row order. Not sorted by time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    points: Vec<DataPoint>,
}

impl Dataset {
    pub fn new(points: Vec<DataPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataPoint> {
        self.points.iter()
    }

    /// Earliest and latest timestamps, scanning every point.
    pub fn time_extent(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.points.iter().fold(None, |acc, p| match acc {
            None => Some((p.timestamp, p.timestamp)),
            Some((lo, hi)) => Some((lo.min(p.timestamp), hi.max(p.timestamp))),
        })
    }

    pub fn max_value(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.value)
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }
}

impl FromIterator<DataPoint> for Dataset {
    fn from_iter<I: IntoIterator<Item = DataPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a DataPoint;
    type IntoIter = std::slice::Iter<'a, DataPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Interpolation used on the value axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScaleMode {
    #[default]
    Linear,
    Logarithmic,
}

impl TryFrom<u8> for ScaleMode {
    type Error = eyre::Report;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Linear),
            1 => Ok(Self::Logarithmic),
            other => Err(eyre!("unknown scale mode {other}")),
        }
    }
}

impl FromStr for ScaleMode {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "lin" => Ok(Self::Linear),
            "log" | "logarithmic" => Ok(Self::Logarithmic),
            other => other
                .parse::<u8>()
                .map_err(|_| eyre!("unknown scale mode '{other}'"))
                .and_then(Self::try_from),
        }
    }
}

/// Pixel extent of the drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_scale_mode_from_selector_value() {
        assert_eq!(ScaleMode::try_from(0).unwrap(), ScaleMode::Linear);
        assert_eq!(ScaleMode::try_from(1).unwrap(), ScaleMode::Logarithmic);
        assert!(ScaleMode::try_from(2).is_err());
        assert_eq!("log".parse::<ScaleMode>().unwrap(), ScaleMode::Logarithmic);
        assert_eq!("0".parse::<ScaleMode>().unwrap(), ScaleMode::Linear);
        assert!("cubic".parse::<ScaleMode>().is_err());
    }

    #[test]
    fn test_extents_do_not_assume_order() {
        let t = |d| Utc.with_ymd_and_hms(2015, 6, d, 0, 0, 0).unwrap();
        let dataset = Dataset::new(vec![
            DataPoint::new(t(3), 5.0),
            DataPoint::new(t(1), 9.0),
            DataPoint::new(t(2), 1.0),
        ]);
        assert_eq!(dataset.time_extent(), Some((t(1), t(3))));
        assert_eq!(dataset.max_value(), Some(9.0));
        assert_eq!(Dataset::default().time_extent(), None);
        assert_eq!(Dataset::default().max_value(), None);
    }
}

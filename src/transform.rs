//! Transform helper for coordinate projection

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::warn;

use crate::data_types::{ChartRange, DataPoint, Dataset, Margins, ScaleMode, Viewport};
use crate::scales::{ChartScale, TimeScale};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Straight segments through mapped samples, in dataset order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LinePath {
    pub points: Vec<ScreenPoint>,
}

impl LinePath {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// SVG path data, `M x,yLx,y...`.
    pub fn to_svg_data(&self) -> String {
        let mut d = String::new();
        for (i, p) in self.points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd}{},{}", p.x, p.y);
        }
        d
    }
}

/// Pixel mappings for one render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotTransform {
    pub x_scale: TimeScale,
    pub y_scale: ChartScale,
    pub viewport: Viewport,
    pub margins: Margins,
}

impl PlotTransform {
    pub fn new(x_scale: TimeScale, y_scale: ChartScale, viewport: Viewport, margins: Margins) -> Self {
        Self {
            x_scale,
            y_scale,
            viewport,
            margins,
        }
    }

    /// Builds the time and value mappings for `range` inside `viewport`.
    ///
    /// Returns `None` when the range has no extent to draw. When the
    /// viewport is smaller than its margins, the pixel span collapses onto
    /// the leading margin instead of flipping direction. An end of range
    /// earlier than `latest_sample` (a stale log horizon) is widened to
    /// that sample on the pixel axis only; `range` is left untouched.
    pub fn build(
        range: &ChartRange,
        latest_sample: Option<DateTime<Utc>>,
        viewport: Viewport,
        mode: ScaleMode,
        margins: &Margins,
        tz: Tz,
    ) -> Option<Self> {
        let (start_ms, mut end_ms) = range.time_domain_millis()?;
        let value_domain = range.value_domain()?;

        if let Some(latest) = latest_sample {
            let latest_ms = latest.timestamp_millis() as f64;
            if latest_ms > end_ms {
                warn!(end = ?range.end, %latest, "time axis ends before the latest sample, widening it");
                end_ms = latest_ms;
            }
        }
        let time_domain = (start_ms, end_ms.max(start_ms));

        let left = margins.left;
        let right = (viewport.width - margins.right).max(left);
        let top = margins.top;
        let bottom = (viewport.height - margins.bottom).max(top);

        let x_scale = TimeScale::new(time_domain, (left, right), tz);
        let y_scale = ChartScale::for_mode(mode, value_domain, (bottom, top));
        Some(Self::new(x_scale, y_scale, viewport, *margins))
    }

    pub fn x_of(&self, t: DateTime<Utc>) -> f32 {
        self.x_scale.map(t)
    }

    pub fn y_of(&self, value: f64) -> f32 {
        self.y_scale.map(value)
    }

    pub fn data_to_screen(&self, point: &DataPoint) -> ScreenPoint {
        ScreenPoint::new(self.x_of(point.timestamp), self.y_of(point.value))
    }

    pub fn screen_to_data(&self, point: ScreenPoint) -> Option<(DateTime<Utc>, f64)> {
        Some((self.x_scale.invert(point.x)?, self.y_scale.invert(point.y)))
    }

    pub fn line_path(&self, dataset: &Dataset) -> LinePath {
        LinePath {
            points: dataset.iter().map(|p| self.data_to_screen(p)).collect(),
        }
    }
}

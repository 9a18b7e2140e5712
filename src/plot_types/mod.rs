// Plot types module

pub mod annotation;
pub mod line;
pub mod points;

pub use annotation::NoteBanner;
pub use line::LinePlot;
pub use points::PointsPlot;

use crate::reconcile::{SetDiff, Transition};
use crate::transform::{LinePath, ScreenPoint};

/// Changes to the data layer for one render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesVisual {
    /// `None` when line drawing is disabled or there is nothing to draw.
    pub line: Option<Transition<LinePath>>,
    /// `None` when point markers are disabled.
    pub points: Option<SetDiff<usize, ScreenPoint>>,
    pub point_radius: f32,
    pub note: Option<NoteBanner>,
}

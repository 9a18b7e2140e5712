use std::time::Duration;

use crate::data_types::{ChartRange, Dataset};
use crate::reconcile::{ReconciledSet, SetDiff};
use crate::transform::{PlotTransform, ScreenPoint};

/// One marker per sample, keyed by its position in the dataset.
#[derive(Clone, Debug, Default)]
pub struct PointsPlot {
    markers: ReconciledSet<usize, ScreenPoint>,
}

impl PointsPlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Where fresh markers start: the right end of the time axis on the
    /// value baseline.
    pub fn entry_corner(transform: &PlotTransform, range: &ChartRange) -> ScreenPoint {
        let x = range
            .end
            .map_or(transform.x_scale.range().1, |e| transform.x_of(e));
        ScreenPoint::new(x, transform.y_of(range.min))
    }

    pub fn render(
        &mut self,
        transform: &PlotTransform,
        range: &ChartRange,
        dataset: &Dataset,
        duration: Duration,
    ) -> SetDiff<usize, ScreenPoint> {
        let corner = Self::entry_corner(transform, range);
        let targets = dataset
            .iter()
            .enumerate()
            .map(|(i, p)| (i, transform.data_to_screen(p)));
        self.markers.reconcile(targets, duration, |_, _| corner)
    }

    pub fn clear(&mut self) -> SetDiff<usize, ScreenPoint> {
        self.markers.clear()
    }
}

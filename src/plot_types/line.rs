use std::time::Duration;

use crate::data_types::Dataset;
use crate::reconcile::Transition;
use crate::transform::{LinePath, PlotTransform};

/// Connected line through the dataset. Remembers the last drawn path so the
/// next one can morph from it.
#[derive(Clone, Debug, Default)]
pub struct LinePlot {
    current: Option<LinePath>,
}

impl LinePlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&LinePath> {
        self.current.as_ref()
    }

    pub fn render(
        &mut self,
        transform: &PlotTransform,
        dataset: &Dataset,
        duration: Duration,
    ) -> Transition<LinePath> {
        let next = transform.line_path(dataset);
        let transition = match self.current.take() {
            Some(prev) => Transition::new(prev, next.clone(), duration),
            None => Transition::settled(next.clone()),
        };
        self.current = Some(next);
        transition
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

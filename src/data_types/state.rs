use std::sync::Arc;

use super::{ChartRange, Dataset};

/// Dataset and the range derived from it. Always replaced as a whole.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub dataset: Arc<Dataset>,
    pub range: ChartRange,
}

/// Lifecycle of the chart.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ChartState {
    /// No feed body has been applied yet.
    #[default]
    Uninitialized,
    Loaded(Session),
}

impl ChartState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Uninitialized => None,
            Self::Loaded(session) => Some(session),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

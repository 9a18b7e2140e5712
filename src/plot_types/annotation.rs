use serde::{Deserialize, Serialize};

use crate::data_types::{ChartRange, NoteConfig};
use crate::transform::PlotTransform;

/// Banner spanning the full time axis at a fixed height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoteBanner {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NoteBanner {
    pub fn layout(transform: &PlotTransform, range: &ChartRange, note: &NoteConfig) -> Option<Self> {
        let x0 = transform.x_of(range.start?);
        let x1 = transform.x_of(range.end?);
        Some(Self {
            x: x0,
            y: note.y,
            width: (x1 - x0).max(0.0),
            height: note.height,
        })
    }
}

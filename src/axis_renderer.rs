use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::data_types::{AxisEdge, ChartConfig, ChartRange, MinorTickPolicy, TickKey};
use crate::reconcile::{Lerp, ReconciledSet, SetDiff, Transition};
use crate::transform::{PlotTransform, ScreenPoint};
use crate::utils::date_formatter::{format_time_tick, format_value_tick};

/// One tick mark with its label, anchored on its axis line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickMark {
    pub edge: AxisEdge,
    pub anchor: ScreenPoint,
    pub length: f32,
    /// Empty for minor log ticks.
    pub label: String,
    pub major: bool,
}

impl Lerp for TickMark {
    /// Only the anchor moves; mark and label switch to the new state at once.
    fn lerp(&self, to: &Self, t: f32) -> Self {
        Self {
            anchor: self.anchor.lerp(&to.anchor, t),
            ..to.clone()
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: ScreenPoint,
    pub to: ScreenPoint,
}

impl Lerp for Segment {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        Self {
            from: self.from.lerp(&to.from, t),
            to: self.to.lerp(&to.to, t),
        }
    }
}

/// Axis elements currently on screen.
#[derive(Clone, Debug, Default)]
pub struct AxisScene {
    pub x_line: Option<Segment>,
    pub y_line: Option<Segment>,
    pub x_ticks: ReconciledSet<TickKey, TickMark>,
    pub y_ticks: ReconciledSet<TickKey, TickMark>,
}

/// Changes to apply to both axes for one render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisVisual {
    pub x_line: Option<Transition<Segment>>,
    pub y_line: Option<Transition<Segment>>,
    pub x_ticks: SetDiff<TickKey, TickMark>,
    pub y_ticks: SetDiff<TickKey, TickMark>,
    /// Label position relative to its tick anchor.
    pub x_label_offset: ScreenPoint,
    pub y_label_offset: ScreenPoint,
}

pub struct AxisRenderer;

impl AxisRenderer {
    /// About one tick per 100 pixels.
    pub fn tick_count(extent_px: f32) -> usize {
        ((extent_px / 100.0).floor() as usize).max(1)
    }

    pub fn x_ticks(
        transform: &PlotTransform,
        range: &ChartRange,
        config: &ChartConfig,
    ) -> Vec<(TickKey, TickMark)> {
        let baseline = transform.y_of(range.min);
        transform
            .x_scale
            .ticks(Self::tick_count(transform.viewport.width))
            .into_iter()
            .map(|t| {
                let mark = TickMark {
                    edge: AxisEdge::Bottom,
                    anchor: ScreenPoint::new(transform.x_of(t), baseline),
                    length: config.tick_lengths.x,
                    label: format_time_tick(t, config.label_timezone),
                    major: true,
                };
                (TickKey::time(t), mark)
            })
            .collect()
    }

    pub fn y_ticks(
        transform: &PlotTransform,
        range: &ChartRange,
        config: &ChartConfig,
    ) -> Vec<(TickKey, TickMark)> {
        let axis_x = range.start.map_or(transform.margins.left, |s| transform.x_of(s));
        transform
            .y_scale
            .ticks(Self::tick_count(transform.viewport.height))
            .into_iter()
            .map(|v| {
                let major = transform.y_scale.is_major_tick(v);
                let (length, label) = if major {
                    (config.tick_lengths.y, format_value_tick(v, &config.value_labels))
                } else {
                    let length = match config.minor_ticks {
                        MinorTickPolicy::BlankLabel => config.tick_lengths.y,
                        MinorTickPolicy::Shortened => config.tick_lengths.minor,
                    };
                    (length, String::new())
                };
                let mark = TickMark {
                    edge: AxisEdge::Left,
                    anchor: ScreenPoint::new(axis_x, transform.y_of(v)),
                    length,
                    label,
                    major,
                };
                (TickKey::value(v), mark)
            })
            .collect()
    }

    /// Reconciles both axes against what `scene` last drew.
    pub fn render_axes(
        scene: &mut AxisScene,
        transform: &PlotTransform,
        range: &ChartRange,
        config: &ChartConfig,
    ) -> AxisVisual {
        let duration = config.transition();

        let origin = ScreenPoint::new(
            range.start.map_or(transform.margins.left, |s| transform.x_of(s)),
            transform.y_of(range.min),
        );
        let x_end = range.end.map_or(origin.x, |e| transform.x_of(e));
        let y_end = range.max.map_or(origin.y, |m| transform.y_of(m));

        let x_line = Segment {
            from: origin,
            to: ScreenPoint::new(x_end, origin.y),
        };
        let y_line = Segment {
            from: origin,
            to: ScreenPoint::new(origin.x, y_end),
        };

        let x_ticks = scene.x_ticks.reconcile(
            Self::x_ticks(transform, range, config),
            duration,
            |_, target| target.clone(),
        );
        let y_ticks = scene.y_ticks.reconcile(
            Self::y_ticks(transform, range, config),
            duration,
            |_, target| target.clone(),
        );

        let d = config.axis_label_distance;
        AxisVisual {
            x_line: Some(transition_line(&mut scene.x_line, x_line, duration)),
            y_line: Some(transition_line(&mut scene.y_line, y_line, duration)),
            x_ticks,
            y_ticks,
            x_label_offset: ScreenPoint::new(-d.x * 1.41, d.x * 1.41),
            y_label_offset: ScreenPoint::new(-d.y, 0.0),
        }
    }

    /// Removes every tick and both axis lines.
    pub fn clear(scene: &mut AxisScene, config: &ChartConfig) -> AxisVisual {
        scene.x_line = None;
        scene.y_line = None;
        let d = config.axis_label_distance;
        AxisVisual {
            x_line: None,
            y_line: None,
            x_ticks: scene.x_ticks.clear(),
            y_ticks: scene.y_ticks.clear(),
            x_label_offset: ScreenPoint::new(-d.x * 1.41, d.x * 1.41),
            y_label_offset: ScreenPoint::new(-d.y, 0.0),
        }
    }
}

fn transition_line(slot: &mut Option<Segment>, next: Segment, duration: Duration) -> Transition<Segment> {
    let transition = match slot.take() {
        Some(prev) => Transition::new(prev, next, duration),
        None => Transition::settled(next),
    };
    *slot = Some(next);
    transition
}

// Rendering functions for the chart

use eyre::{Result, WrapErr};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::axis_renderer::{AxisRenderer, AxisScene, AxisVisual, Segment, TickMark};
use crate::data_types::{AxisEdge, ChartConfig, ChartRange, Dataset, TickKey, Viewport};
use crate::plot_types::{LinePlot, NoteBanner, PointsPlot, SeriesVisual};
use crate::reconcile::{SetDiff, Transition};
use crate::transform::{PlotTransform, ScreenPoint};

/// One self-contained batch of visual changes.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub viewport: Viewport,
    pub axes: AxisVisual,
    pub series: SeriesVisual,
}

/// Surface the chart draws on.
pub trait RenderTarget {
    /// Current pixel size; queried on every render pass.
    fn viewport(&self) -> Viewport;

    fn present(&mut self, frame: &Frame) -> Result<()>;
}

/// Everything drawn by the previous pass.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    axes: AxisScene,
    line: LinePlot,
    points: PointsPlot,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles the scene with `dataset` mapped through `transform`.
    /// Without a transform (nothing to draw) every element exits.
    pub fn render(
        &mut self,
        transform: Option<&PlotTransform>,
        range: &ChartRange,
        dataset: &Dataset,
        viewport: Viewport,
        config: &ChartConfig,
    ) -> Frame {
        let Some(transform) = transform else {
            return self.clear(viewport, config);
        };
        let duration = config.transition();

        let axes = AxisRenderer::render_axes(&mut self.axes, transform, range, config);
        let line = config
            .series
            .line
            .then(|| self.line.render(transform, dataset, duration));
        let points = config
            .series
            .points
            .then(|| self.points.render(transform, range, dataset, duration));

        Frame {
            viewport,
            axes,
            series: SeriesVisual {
                line,
                points,
                point_radius: config.series.point_radius,
                note: NoteBanner::layout(transform, range, &config.note),
            },
        }
    }

    pub fn clear(&mut self, viewport: Viewport, config: &ChartConfig) -> Frame {
        self.line.clear();
        let points = config.series.points.then(|| self.points.clear());
        Frame {
            viewport,
            axes: AxisRenderer::clear(&mut self.axes, config),
            series: SeriesVisual {
                line: None,
                points,
                point_radius: config.series.point_radius,
                note: None,
            },
        }
    }
}

/// Writes a frame as an SVG document.
pub struct SvgDocument;

impl SvgDocument {
    /// Samples every transition `elapsed` after the frame was issued.
    /// `Duration::MAX` yields the settled picture.
    pub fn render(frame: &Frame, elapsed: Duration) -> String {
        let Viewport { width, height } = frame.viewport;
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        svg.push('\n');

        let axes = &frame.axes;
        Self::axis_group(&mut svg, "x", axes.x_line.as_ref(), &axes.x_ticks, axes.x_label_offset, elapsed);
        Self::axis_group(&mut svg, "y", axes.y_line.as_ref(), &axes.y_ticks, axes.y_label_offset, elapsed);

        svg.push_str("  <g class=\"plot-area\">\n");
        if let Some(line) = &frame.series.line {
            let _ = writeln!(
                svg,
                r#"    <path class="series" d="{}"/>"#,
                line.at(elapsed).to_svg_data()
            );
        }
        if let Some(points) = &frame.series.points {
            for (_, tr) in points.live() {
                let p = tr.at(elapsed);
                let _ = writeln!(
                    svg,
                    r#"    <circle class="data-point" r="{}" cx="{}" cy="{}"/>"#,
                    frame.series.point_radius, p.x, p.y
                );
            }
        }
        svg.push_str("  </g>\n");

        if let Some(note) = &frame.series.note {
            let _ = writeln!(
                svg,
                r#"  <rect class="note" x="{}" y="{}" width="{}" height="{}"/>"#,
                note.x, note.y, note.width, note.height
            );
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn axis_group(
        svg: &mut String,
        axis: &str,
        line: Option<&Transition<Segment>>,
        ticks: &SetDiff<TickKey, TickMark>,
        label_offset: ScreenPoint,
        elapsed: Duration,
    ) {
        let _ = writeln!(svg, r#"  <g class="axis {axis}-axis">"#);
        if let Some(line) = line {
            let seg = line.at(elapsed);
            let _ = writeln!(
                svg,
                r#"    <line class="axis-line {axis}-axis-line" x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
                seg.from.x, seg.from.y, seg.to.x, seg.to.y
            );
        }
        for (_, tr) in ticks.live() {
            let mark = tr.at(elapsed);
            let (x2, y2) = match mark.edge {
                AxisEdge::Bottom => (0.0, mark.length),
                AxisEdge::Left => (-mark.length, 0.0),
            };
            let _ = writeln!(
                svg,
                r#"    <g class="label axis-label {axis}-axis-label" transform="translate({},{})"><line x1="0" y1="0" x2="{x2}" y2="{y2}"/><text x="{}" y="{}">{}</text></g>"#,
                mark.anchor.x,
                mark.anchor.y,
                label_offset.x,
                label_offset.y,
                escape_text(&mark.label)
            );
        }
        svg.push_str("  </g>\n");
    }
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Writes the settled picture of every presented frame to a file.
#[derive(Clone, Debug)]
pub struct SvgFileTarget {
    path: PathBuf,
    viewport: Viewport,
}

impl SvgFileTarget {
    pub fn new(path: impl Into<PathBuf>, viewport: Viewport) -> Self {
        Self {
            path: path.into(),
            viewport,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The surface was resized; takes effect on the next render pass.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}

impl RenderTarget for SvgFileTarget {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        let svg = SvgDocument::render(frame, Duration::MAX);
        std::fs::write(&self.path, svg)
            .wrap_err_with(|| format!("writing {}", self.path.display()))
    }
}

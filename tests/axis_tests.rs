use chrono::{DateTime, TimeZone, Utc};
use feed_chart::axis_renderer::{AxisRenderer, AxisScene};
use feed_chart::data_types::{
    ChartConfig, ChartRange, LogHorizon, Margins, MinorTickPolicy, ScaleMode, TickKey,
    ValueLabelFormat, Viewport,
};
use feed_chart::transform::PlotTransform;

fn june(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2015, 6, day, hour, 0, 0).unwrap()
}

fn linear_range(max: f64) -> ChartRange {
    ChartRange {
        start: Some(june(29, 0)),
        end: Some(june(30, 0) + chrono::Duration::days(1)),
        min: 0.0,
        max: Some(max),
    }
}

fn log_range() -> ChartRange {
    ChartRange {
        start: Some(june(29, 0)),
        end: Some(june(30, 22)),
        min: 1e5,
        max: Some(1.6e9),
    }
}

fn transform(range: &ChartRange, mode: ScaleMode, viewport: Viewport) -> PlotTransform {
    PlotTransform::build(range, None, viewport, mode, &Margins::default(), chrono_tz::UTC).unwrap()
}

const VIEWPORT: Viewport = Viewport {
    width: 1000.0,
    height: 700.0,
};

#[test]
fn test_tick_count_scales_with_extent() {
    assert_eq!(AxisRenderer::tick_count(1000.0), 10);
    assert_eq!(AxisRenderer::tick_count(700.0), 7);
    assert_eq!(AxisRenderer::tick_count(40.0), 1);
}

#[test]
fn test_time_tick_labels_and_positions() {
    let config = ChartConfig::default();
    let range = linear_range(1000.0);
    let tr = transform(&range, ScaleMode::Linear, VIEWPORT);
    let ticks = AxisRenderer::x_ticks(&tr, &range, &config);

    assert_eq!(ticks.len(), 9);
    let (key, first) = &ticks[0];
    assert_eq!(*key, TickKey::time(june(29, 0)));
    assert_eq!(first.label, "Mon 00:00");
    assert_eq!(first.anchor.x, 100.0);
    assert_eq!(first.anchor.y, tr.y_of(0.0));
    assert_eq!(first.length, config.tick_lengths.x);
    assert_eq!(ticks[1].1.label, "Mon 06:00");
    assert_eq!(ticks[8].1.label, "Wed 00:00");
}

#[test]
fn test_value_tick_labels_linear() {
    let config = ChartConfig::default();
    let range = linear_range(1000.0);
    let tr = transform(&range, ScaleMode::Linear, VIEWPORT);
    let labels: Vec<String> = AxisRenderer::y_ticks(&tr, &range, &config)
        .into_iter()
        .map(|(_, mark)| mark.label)
        .collect();
    assert_eq!(labels, vec!["0", "500", "1000"]);
}

#[test]
fn test_value_tick_labels_currency() {
    let config = ChartConfig {
        value_labels: ValueLabelFormat::Currency {
            symbol: "€".to_string(),
        },
        ..ChartConfig::default()
    };
    let range = linear_range(2e9);
    let tr = transform(&range, ScaleMode::Linear, VIEWPORT);
    let ticks = AxisRenderer::y_ticks(&tr, &range, &config);
    let last = &ticks.last().unwrap().1;
    assert_eq!(last.label, "€2.0bn");
    assert!(ticks.iter().all(|(_, m)| m.major));
}

#[test]
fn test_log_minor_ticks_blank_label() {
    let config = ChartConfig::default();
    let range = log_range();
    let tr = transform(&range, ScaleMode::Logarithmic, VIEWPORT);
    let ticks = AxisRenderer::y_ticks(&tr, &range, &config);

    let labeled: Vec<&str> = ticks
        .iter()
        .filter(|(_, m)| !m.label.is_empty())
        .map(|(_, m)| m.label.as_str())
        .collect();
    assert_eq!(labeled, vec!["100k", "1000k", "10M", "100M", "1000M"]);
    for (_, mark) in &ticks {
        assert_eq!(mark.major, !mark.label.is_empty());
        assert_eq!(mark.length, config.tick_lengths.y);
    }
}

#[test]
fn test_log_minor_ticks_shortened() {
    let config = ChartConfig {
        minor_ticks: MinorTickPolicy::Shortened,
        ..ChartConfig::default()
    };
    let range = log_range();
    let tr = transform(&range, ScaleMode::Logarithmic, VIEWPORT);
    for (_, mark) in AxisRenderer::y_ticks(&tr, &range, &config) {
        let expected = if mark.major {
            config.tick_lengths.y
        } else {
            config.tick_lengths.minor
        };
        assert_eq!(mark.length, expected);
    }
}

#[test]
fn test_rerender_unchanged_is_idempotent() {
    let config = ChartConfig::default();
    let range = linear_range(1000.0);
    let tr = transform(&range, ScaleMode::Linear, VIEWPORT);
    let mut scene = AxisScene::default();

    let first = AxisRenderer::render_axes(&mut scene, &tr, &range, &config);
    assert_eq!(first.x_ticks.entered.len(), 9);
    assert!(first.x_ticks.updated.is_empty());

    let second = AxisRenderer::render_axes(&mut scene, &tr, &range, &config);
    assert!(second.x_ticks.is_unchanged());
    assert!(second.y_ticks.is_unchanged());
    assert!(second.x_line.unwrap().is_noop());
    assert!(second.y_line.unwrap().is_noop());
}

#[test]
fn test_growing_domain_keeps_tick_identity() {
    let config = ChartConfig::default();
    let mut scene = AxisScene::default();

    let small = linear_range(1000.0);
    AxisRenderer::render_axes(&mut scene, &transform(&small, ScaleMode::Linear, VIEWPORT), &small, &config);

    let large = linear_range(1500.0);
    let visual = AxisRenderer::render_axes(&mut scene, &transform(&large, ScaleMode::Linear, VIEWPORT), &large, &config);
    let entered: Vec<TickKey> = visual.y_ticks.entered_keys().copied().collect();
    assert_eq!(entered, vec![TickKey::value(1500.0)]);
    assert!(visual.y_ticks.exited.is_empty());
    assert_eq!(visual.y_ticks.updated.len(), 3);

    // 1000 moved down the screen as the axis grew.
    let (_, thousand) = visual
        .y_ticks
        .updated
        .iter()
        .find(|(k, _)| *k == TickKey::value(1000.0))
        .unwrap();
    assert_eq!(thousand.from.anchor.y, 120.0);
    assert_eq!(thousand.to.anchor.y, 280.0);
    assert_eq!(thousand.duration, config.transition());

    let back = AxisRenderer::render_axes(&mut scene, &transform(&small, ScaleMode::Linear, VIEWPORT), &small, &config);
    let exited: Vec<TickKey> = back.y_ticks.exited_keys().copied().collect();
    assert_eq!(exited, vec![TickKey::value(1500.0)]);
}

#[test]
fn test_axis_lines_follow_range() {
    let config = ChartConfig::default();
    let range = linear_range(1000.0);
    let tr = transform(&range, ScaleMode::Linear, VIEWPORT);
    let visual = AxisRenderer::render_axes(&mut AxisScene::default(), &tr, &range, &config);

    let x_line = visual.x_line.unwrap().to;
    assert_eq!((x_line.from.x, x_line.from.y), (100.0, 600.0));
    assert_eq!((x_line.to.x, x_line.to.y), (900.0, 600.0));
    let y_line = visual.y_line.unwrap().to;
    assert_eq!((y_line.to.x, y_line.to.y), (100.0, 120.0));
}

#[test]
fn test_fixed_horizon_extends_time_axis() {
    let config = ChartConfig::default();
    assert!(matches!(config.log_scale.horizon, LogHorizon::AfterStart { .. }));
    let range = log_range();
    let tr = transform(&range, ScaleMode::Logarithmic, VIEWPORT);
    assert_eq!(tr.x_of(june(30, 22)), 900.0);
}

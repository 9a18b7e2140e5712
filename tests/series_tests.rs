use chrono::{DateTime, TimeZone, Utc};
use std::time::Duration;

use feed_chart::data_types::{
    ChartConfig, ChartRange, DataPoint, Dataset, Margins, NoteConfig, ScaleMode, Viewport,
};
use feed_chart::plot_types::{LinePlot, NoteBanner, PointsPlot};
use feed_chart::transform::{PlotTransform, ScreenPoint};

const STEP: Duration = Duration::from_millis(200);

fn june(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2015, 6, day, 0, 0, 0).unwrap()
}

fn dataset(days: &[(u32, f64)]) -> Dataset {
    days.iter().map(|&(d, v)| DataPoint::new(june(d), v)).collect()
}

fn setup(data: &Dataset) -> (ChartRange, PlotTransform) {
    let config = ChartConfig::default();
    let range = ChartRange::compute(data, ScaleMode::Linear, &config.log_scale);
    let transform = PlotTransform::build(
        &range,
        None,
        Viewport::new(1200.0, 700.0),
        ScaleMode::Linear,
        &Margins::default(),
        chrono_tz::UTC,
    )
    .unwrap();
    (range, transform)
}

#[test]
fn test_line_path_visits_points_in_dataset_order() {
    let data = dataset(&[(1, 0.0), (3, 1000.0), (2, 500.0)]);
    let (_, tr) = setup(&data);
    let path = tr.line_path(&data);
    assert_eq!(
        path.points,
        vec![
            ScreenPoint::new(100.0, 600.0),
            ScreenPoint::new(1100.0, 120.0),
            ScreenPoint::new(600.0, 360.0),
        ]
    );
    assert_eq!(path.to_svg_data(), "M100,600L1100,120L600,360");
}

#[test]
fn test_line_morphs_from_previous_path() {
    let mut plot = LinePlot::new();
    let first = dataset(&[(1, 0.0), (3, 1000.0)]);
    let (_, tr) = setup(&first);
    let initial = plot.render(&tr, &first, STEP);
    assert!(initial.is_noop());

    let second = dataset(&[(1, 500.0), (3, 1000.0)]);
    let (_, tr2) = setup(&second);
    let morph = plot.render(&tr2, &second, STEP);
    assert_eq!(morph.from, initial.to);
    assert_eq!(morph.to.points[0], ScreenPoint::new(100.0, 360.0));
    assert_eq!(morph.duration, STEP);
    assert_eq!(morph.at(Duration::from_millis(100)).points[0], ScreenPoint::new(100.0, 480.0));
    assert_eq!(plot.current(), Some(&morph.to));
}

#[test]
fn test_fresh_points_slide_in_from_corner() {
    let mut plot = PointsPlot::new();
    let first = dataset(&[(1, 0.0), (2, 500.0), (3, 1000.0)]);
    let (range, tr) = setup(&first);
    let diff = plot.render(&tr, &range, &first, STEP);
    assert_eq!(diff.entered.len(), 3);

    let second = dataset(&[(1, 0.0), (2, 500.0), (3, 1000.0), (4, 250.0)]);
    let (range2, tr2) = setup(&second);
    let diff = plot.render(&tr2, &range2, &second, STEP);
    assert_eq!(diff.updated.len(), 3);
    assert_eq!(diff.entered.len(), 1);

    let (key, entering) = &diff.entered[0];
    assert_eq!(*key, 3);
    let corner = PointsPlot::entry_corner(&tr2, &range2);
    assert_eq!(corner, ScreenPoint::new(1100.0, 600.0));
    assert_eq!(entering.from, corner);
    assert_eq!(entering.to, tr2.data_to_screen(&second.points()[3]));

    let shrunk = dataset(&[(1, 0.0), (2, 500.0)]);
    let (range3, tr3) = setup(&shrunk);
    let diff = plot.render(&tr3, &range3, &shrunk, STEP);
    let mut exited: Vec<usize> = diff.exited_keys().copied().collect();
    exited.sort();
    assert_eq!(exited, vec![2, 3]);
    assert_eq!(plot.len(), 2);
}

#[test]
fn test_note_banner_spans_time_axis() {
    let data = dataset(&[(1, 0.0), (3, 1000.0)]);
    let (range, tr) = setup(&data);
    let note = NoteBanner::layout(&tr, &range, &NoteConfig::default()).unwrap();
    assert_eq!(note.x, 100.0);
    assert_eq!(note.width, 1000.0);
    assert_eq!(note.y, 30.0);
    assert_eq!(note.height, 70.0);
}

//! feed_chart: time-series chart engine for a polled tab-separated feed

pub mod axis_renderer;
pub mod chart_view;
pub mod data_types;
pub mod feed_source;
pub mod plot_types;
pub mod reconcile;
pub mod rendering;
pub mod scales;
pub mod transform;
pub mod utils;

pub use chart_view::{ChartEvent, ChartView, FetchTicket};
pub use data_types::{ChartConfig, ChartRange, DataPoint, Dataset, ScaleMode, Viewport};
pub use feed_source::parse_feed;
pub use rendering::{Frame, RenderTarget, Scene, SvgDocument, SvgFileTarget};

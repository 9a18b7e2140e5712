pub mod plot_configs;
pub mod axis;
pub mod data;
pub mod state;

pub use plot_configs::*;
pub use axis::*;
pub use data::*;
pub use state::*;

//! Terminal user interface.
//!
//! - [`Console`] for results and status lines
//! - [`StageProgress`] for inventory stage progress bars
//! - [`NetverTheme`] for colors

pub mod output;
pub mod progress;
pub mod theme;

pub use output::{Console, OutputMode};
pub use progress::StageProgress;
pub use theme::{should_use_colors, NetverTheme};

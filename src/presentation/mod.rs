//! View-facing output: render geometry and formatted readouts.

pub mod readout;
pub mod snapshot;

pub use readout::{CrosshairLabel, CrosshairLabels, HeaderReadout};
pub use snapshot::{AreaPath, AxisTick, RenderSnapshot};

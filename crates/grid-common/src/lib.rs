//! Common types shared by the GRIB2 decoder and the grid encoder.
//!
//! A decoded file is represented as a [`Dataset`]: ordered data variables
//! holding 2-D sample grids, latitude/longitude [`Axis`] values that are
//! either regular (1-D) or curvilinear (2-D), per-variable attributes, and
//! auxiliary coordinates such as `time`.

pub mod axis;
pub mod dataset;
pub mod error;
pub mod grid;

pub use axis::{Axis, Dimension};
pub use dataset::{AttrValue, CoordinateValues, DataVariable, Dataset};
pub use error::{GridError, GridResult};
pub use grid::{Grid, ScanMode};

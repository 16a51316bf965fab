//! North-up orientation of decoded grids.

use grid_common::{Axis, Dimension, Grid};
use tracing::debug;

/// A latitude axis and value grid with row 0 as the northernmost row.
#[derive(Debug, Clone, PartialEq)]
pub struct Oriented<T> {
    pub latitude: Axis,
    pub values: Grid<T>,
    /// Whether the rows were reversed. Callers holding a curvilinear
    /// longitude axis must flip it too.
    pub flipped: bool,
}

/// Flip the grid vertically when latitude increases from the first row to
/// the last (south-to-north storage).
///
/// Only the first and last latitude samples are compared; a single-row axis
/// is never flipped.
pub fn normalize_orientation<T>(latitude: Axis, values: Grid<T>) -> Oriented<T> {
    let first = latitude.first(Dimension::Rows);
    let last = latitude.last(Dimension::Rows);

    match (first, last) {
        (Some(first), Some(last)) if first < last => {
            debug!(first, last, rows = values.rows(), "Flipping south-up grid");
            Oriented {
                latitude: latitude.flip_rows(),
                values: values.flip_rows(),
                flipped: true,
            }
        }
        _ => Oriented {
            latitude,
            values,
            flipped: false,
        },
    }
}

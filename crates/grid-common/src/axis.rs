//! Latitude/longitude coordinate axes.

use crate::error::{GridError, GridResult};
use crate::grid::Grid;
use serde::{Deserialize, Serialize};

/// The grid dimension an axis runs along.
///
/// Latitude varies down the rows, longitude across the columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Rows,
    Columns,
}

/// A coordinate axis: one value per row/column, or one value per cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Axis {
    /// 1-D axis shared by every row (longitude) or column (latitude).
    Regular(Vec<f64>),
    /// 2-D axis with a value for each grid cell (projected grids).
    Curvilinear(Grid<f64>),
}

impl Axis {
    pub fn is_curvilinear(&self) -> bool {
        matches!(self, Axis::Curvilinear(_))
    }

    /// First sample along `along` (the top-left cell for 2-D axes).
    pub fn first(&self, _along: Dimension) -> Option<f64> {
        match self {
            Axis::Regular(values) => values.first().copied(),
            Axis::Curvilinear(grid) => grid.get(0, 0).copied(),
        }
    }

    /// Last sample along `along`: the first column of the last row, or the
    /// last column of the first row.
    pub fn last(&self, along: Dimension) -> Option<f64> {
        match (self, along) {
            (Axis::Regular(values), _) => values.last().copied(),
            (Axis::Curvilinear(grid), Dimension::Rows) => {
                grid.get(grid.rows().checked_sub(1)?, 0).copied()
            }
            (Axis::Curvilinear(grid), Dimension::Columns) => {
                grid.get(0, grid.cols().checked_sub(1)?).copied()
            }
        }
    }

    /// The first two samples along `along`, if there are two.
    pub fn leading_pair(&self, along: Dimension) -> Option<(f64, f64)> {
        match (self, along) {
            (Axis::Regular(values), _) => match values.as_slice() {
                [a, b, ..] => Some((*a, *b)),
                _ => None,
            },
            (Axis::Curvilinear(grid), Dimension::Rows) => {
                Some((*grid.get(0, 0)?, *grid.get(1, 0)?))
            }
            (Axis::Curvilinear(grid), Dimension::Columns) => {
                Some((*grid.get(0, 0)?, *grid.get(0, 1)?))
            }
        }
    }

    /// Apply `f` to every coordinate value.
    pub fn map<F>(self, mut f: F) -> Self
    where
        F: FnMut(f64) -> f64,
    {
        match self {
            Axis::Regular(values) => Axis::Regular(values.into_iter().map(f).collect()),
            Axis::Curvilinear(grid) => Axis::Curvilinear(grid.map(&mut f)),
        }
    }

    /// Reverse the axis along the rows. A 1-D axis is assumed to run along
    /// the rows (latitude).
    pub fn flip_rows(self) -> Self {
        match self {
            Axis::Regular(mut values) => {
                values.reverse();
                Axis::Regular(values)
            }
            Axis::Curvilinear(grid) => Axis::Curvilinear(grid.flip_rows()),
        }
    }

    /// Check that the axis lines up with a `rows × cols` grid along `along`.
    pub fn check_alignment(
        &self,
        name: &'static str,
        along: Dimension,
        rows: usize,
        cols: usize,
    ) -> GridResult<()> {
        let aligned = match (self, along) {
            (Axis::Regular(values), Dimension::Rows) => values.len() == rows,
            (Axis::Regular(values), Dimension::Columns) => values.len() == cols,
            (Axis::Curvilinear(grid), _) => grid.shape() == (rows, cols),
        };
        if aligned {
            return Ok(());
        }
        let actual = match self {
            Axis::Regular(values) => match along {
                Dimension::Rows => (values.len(), 1),
                Dimension::Columns => (1, values.len()),
            },
            Axis::Curvilinear(grid) => grid.shape(),
        };
        Err(GridError::AxisMismatch {
            axis: name,
            rows,
            cols,
            actual,
        })
    }

    pub fn values(&self) -> &[f64] {
        match self {
            Axis::Regular(values) => values,
            Axis::Curvilinear(grid) => grid.as_slice(),
        }
    }
}

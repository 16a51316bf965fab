//! Row-major 2-D grids and GRIB2 scan ordering.

use crate::error::{GridError, GridResult};
use serde::{Deserialize, Serialize};

/// A rectangular, row-major array of `rows × cols` samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Grid<T> {
    /// Wrap a flat row-major buffer, checking its length against the shape.
    pub fn new(rows: usize, cols: usize, data: Vec<T>) -> GridResult<Self> {
        if data.len() != rows * cols {
            return Err(GridError::ShapeMismatch {
                rows,
                cols,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a grid from a list of equally sized rows.
    pub fn from_rows(rows: Vec<Vec<T>>) -> GridResult<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(nrows * ncols);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != ncols {
                return Err(GridError::RaggedRow {
                    row: index,
                    expected: ncols,
                    actual: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self {
            rows: nrows,
            cols: ncols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col)
    }

    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.data[start..start + self.cols])
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Apply `f` to every sample, keeping the shape.
    pub fn map<U, F>(self, f: F) -> Grid<U>
    where
        F: FnMut(T) -> U,
    {
        Grid {
            rows: self.rows,
            cols: self.cols,
            data: self.data.into_iter().map(f).collect(),
        }
    }

    /// Reverse the row order (vertical flip). Applying it twice is the identity.
    pub fn flip_rows(mut self) -> Self {
        let cols = self.cols;
        let rows = self.rows;
        for top in 0..rows / 2 {
            let bottom = rows - 1 - top;
            let (upper, lower) = self.data.split_at_mut(bottom * cols);
            upper[top * cols..(top + 1) * cols].swap_with_slice(&mut lower[..cols]);
        }
        self
    }

    /// Reverse the sample order within every row (horizontal flip).
    pub fn flip_columns(mut self) -> Self {
        if self.cols > 0 {
            for row in self.data.chunks_mut(self.cols) {
                row.reverse();
            }
        }
        self
    }

    /// Reverse every odd row, undoing boustrophedon scanning.
    pub fn unzigzag_rows(mut self) -> Self {
        if self.cols > 0 {
            for row in self.data.chunks_mut(self.cols).skip(1).step_by(2) {
                row.reverse();
            }
        }
        self
    }
}

impl<T: Clone> Grid<T> {
    /// Reinterpret a column-major buffer of `rows × cols` as row-major.
    pub fn from_column_major(rows: usize, cols: usize, data: Vec<T>) -> GridResult<Self> {
        if data.len() != rows * cols {
            return Err(GridError::ShapeMismatch {
                rows,
                cols,
                actual: data.len(),
            });
        }
        let mut out = Vec::with_capacity(data.len());
        for row in 0..rows {
            for col in 0..cols {
                out.push(data[col * rows + row].clone());
            }
        }
        Ok(Self {
            rows,
            cols,
            data: out,
        })
    }
}

/// Scan mode flags for grid data ordering.
///
/// Based on GRIB2 scanning mode (Flag Table 3.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanMode {
    /// +i direction: false = +x (east), true = -x (west)
    pub i_negative: bool,
    /// +j direction: false = -y (south), true = +y (north)
    pub j_positive: bool,
    /// Adjacent points: false = i direction, true = j direction
    pub j_consecutive: bool,
    /// Row scan direction alternates
    pub alternating_rows: bool,
}

impl ScanMode {
    /// Data starts at the top-left, rows run west to east and north to south.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Create from GRIB2 flag byte.
    pub fn from_grib2_flag(flag: u8) -> Self {
        Self {
            i_negative: (flag & 0x80) != 0,
            j_positive: (flag & 0x40) != 0,
            j_consecutive: (flag & 0x20) != 0,
            alternating_rows: (flag & 0x10) != 0,
        }
    }

    /// Rearrange a flat buffer in scan order into a grid of `nj` rows and
    /// `ni` columns whose columns run west to east. Row order stays in scan
    /// order (north-up correction is left to the consumer).
    pub fn arrange<T: Clone>(&self, ni: usize, nj: usize, data: Vec<T>) -> GridResult<Grid<T>> {
        let grid = if self.j_consecutive {
            Grid::from_column_major(nj, ni, data)?
        } else {
            Grid::new(nj, ni, data)?
        };
        let grid = if self.alternating_rows {
            grid.unzigzag_rows()
        } else {
            grid
        };
        Ok(if self.i_negative {
            grid.flip_columns()
        } else {
            grid
        })
    }
}

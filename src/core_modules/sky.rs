// THEORY:
// The `Sky` module is the data layer of the cloud counter. A `Sky` is a
// rectangular grid of Heat Radiation Index readings taken by the satellite,
// one reading per cell. Colder readings (an index of 4 or less) are clouds.
//
// Key architectural principles:
// 1.  **Validated Once**: A `Sky` can only be built through `Sky::new` or
//     `Sky::from_flat`, both of which check that the grid is rectangular. Every
//     consumer downstream can therefore index freely without re-checking shape.
// 2.  **Flat Storage**: Cells are stored row-major in a single `Vec`, the same
//     way the status map of a chunk grid is laid out. `(x, y)` maps to
//     `y * width + x`.
// 3.  **Dumb Data Container**: A `Sky` knows how to classify a single cell as
//     cloud or clear. It knows nothing about neighbours or connectivity; that
//     belongs to the `cloud_detector`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core_modules::error::{Result, SkyError};

/// A single Heat Radiation Index reading.
pub type HeatIndex = i32;

/// Readings at or below this index are clouds.
pub const CLOUD_THRESHOLD: HeatIndex = 4;

/// Classifies a single reading.
#[inline]
pub fn is_cloud_index(value: HeatIndex) -> bool {
    value <= CLOUD_THRESHOLD
}

/// A cell coordinate on the sky grid. `x` is the column, `y` is the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A rectangular grid of heat readings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sky {
    /// Number of columns.
    width: usize,
    /// Number of rows.
    height: usize,
    /// Row-major readings, `width * height` long.
    cells: Vec<HeatIndex>,
}

impl Sky {
    /// Builds a sky from nested rows, rejecting ragged input.
    ///
    /// Zero rows, or rows that are all empty, produce an empty sky.
    pub fn new(rows: Vec<Vec<HeatIndex>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != width)
        {
            return Err(SkyError::InvalidShape {
                row,
                expected: width,
                found,
            });
        }

        let cells = rows.into_iter().flatten().collect();
        Ok(Self {
            width,
            height: if width == 0 { 0 } else { height },
            cells,
        })
    }

    /// Builds a sky from a row-major buffer.
    pub fn from_flat(width: usize, height: usize, cells: Vec<HeatIndex>) -> Result<Self> {
        if width.checked_mul(height) != Some(cells.len()) {
            return Err(SkyError::InvalidDimensions {
                width,
                height,
                cells: cells.len(),
            });
        }
        if width == 0 || height == 0 {
            return Ok(Self::default());
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the reading at column `x`, row `y`, or `None` when out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<HeatIndex> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// True when `(x, y)` is in bounds and holds a cloud reading.
    pub fn is_cloud(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some_and(is_cloud_index)
    }

    pub fn cloud_cell_count(&self) -> usize {
        self.cells.iter().filter(|&&v| is_cloud_index(v)).count()
    }

    /// Iterates the rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[HeatIndex]> {
        // `chunks_exact` rejects a zero size; an empty sky has no cells anyway.
        self.cells.chunks_exact(self.width.max(1))
    }

    pub(crate) fn cells(&self) -> &[HeatIndex] {
        &self.cells
    }
}

impl TryFrom<Vec<Vec<HeatIndex>>> for Sky {
    type Error = SkyError;

    fn try_from(rows: Vec<Vec<HeatIndex>>) -> Result<Self> {
        Sky::new(rows)
    }
}

impl fmt::Display for Sky {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_rectangular_sky() {
        let sky = Sky::new(vec![vec![9, 9, 5, 2], vec![8, 8, 1, 5]]).unwrap();
        assert_eq!(sky.width(), 4);
        assert_eq!(sky.height(), 2);
        assert_eq!(sky.get(3, 0), Some(2));
        assert_eq!(sky.get(2, 1), Some(1));
        assert_eq!(sky.get(4, 0), None);
        assert_eq!(sky.get(0, 2), None);
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Sky::new(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8]]).unwrap_err();
        match err {
            SkyError::InvalidShape {
                row,
                expected,
                found,
            } => {
                assert_eq!(row, 2);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn ragged_after_empty_first_row_is_rejected() {
        assert!(matches!(
            Sky::new(vec![vec![], vec![1]]),
            Err(SkyError::InvalidShape { row: 1, .. })
        ));
    }

    #[test]
    fn empty_inputs_are_empty_skies() {
        let no_rows = Sky::new(vec![]).unwrap();
        assert!(no_rows.is_empty());
        assert_eq!(no_rows.height(), 0);

        let empty_rows = Sky::new(vec![vec![], vec![]]).unwrap();
        assert!(empty_rows.is_empty());
        assert_eq!(empty_rows.rows().count(), 0);
    }

    #[test]
    fn classifies_cells_against_threshold() {
        let sky = Sky::new(vec![vec![4, 5, -3]]).unwrap();
        assert!(sky.is_cloud(0, 0));
        assert!(!sky.is_cloud(1, 0));
        assert!(sky.is_cloud(2, 0));
        assert!(!sky.is_cloud(3, 0));
        assert_eq!(sky.cloud_cell_count(), 2);
    }

    #[test]
    fn from_flat_checks_length() {
        assert!(Sky::from_flat(2, 2, vec![1, 2, 3, 4]).is_ok());
        assert!(matches!(
            Sky::from_flat(2, 2, vec![1, 2, 3]),
            Err(SkyError::InvalidDimensions { cells: 3, .. })
        ));
        assert!(Sky::from_flat(0, 5, vec![]).unwrap().is_empty());
    }

    #[test]
    fn displays_rows_space_separated() {
        let sky = Sky::new(vec![vec![9, 9], vec![1, 5]]).unwrap();
        assert_eq!(sky.to_string(), "9 9\n1 5\n");
    }
}

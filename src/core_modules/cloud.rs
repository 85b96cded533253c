// THEORY:
// A `Cloud` is one connected region of cold cells found in a single sky. It is
// the output of `find_clouds` and summarizes the region so that callers do not
// have to walk the raw cell list to learn its size or extent.
//
// Like `Sky`, a `Cloud` is a dumb data container. Ids are only meaningful
// within the sky they were found in; they follow discovery order.

use serde::Serialize;

use crate::core_modules::sky::{HeatIndex, Point};

/// A single, 4-connected region of cloud cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cloud {
    /// Discovery order within the sky, starting at 0.
    pub id: u64,
    /// Top-left and bottom-right corners of the enclosing box.
    pub bounding_box: (Point, Point),
    /// Every cell in the cloud.
    pub cells: Vec<Point>,
    /// The number of cells, i.e. the cloud's area.
    pub size_in_cells: usize,
    /// The lowest reading inside the cloud.
    pub coldest_index: HeatIndex,
    /// The mean reading across the cloud's cells.
    pub mean_index: f64,
}

impl Cloud {
    /// Width and height of the bounding box in cells.
    pub fn extent(&self) -> (u32, u32) {
        let (top_left, bottom_right) = self.bounding_box;
        (
            bottom_right.x - top_left.x + 1,
            bottom_right.y - top_left.y + 1,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        self.cells.contains(&point)
    }
}

// THEORY:
// The `CloudDetector` is the engine of the cloud counter. It implements a plain
// binary connected-component analysis over a `Sky`: every cell is either cloud
// (index <= 4) or clear, and clouds are the maximal groups of cloud cells joined
// through their up, down, left and right neighbours.
//
// Algorithm steps:
// 1.  **Visited Grid**: A fresh `visited` grid the size of the sky is allocated
//     for every call. A cell flips to `true` at most once and never flips back.
// 2.  **Scan**: Cells are scanned in a fixed order (row-major by default). The
//     first unvisited cloud cell met is the seed of a new cloud.
// 3.  **Region Growing**: From each seed the region is flooded with an explicit
//     stack, not recursion, so a sky that is one giant cloud cannot exhaust the
//     call stack. Only the 4 direct neighbours are ever probed; diagonals are
//     never connected. Probes that fall off the grid do nothing.
// 4.  **Data Aggregation**: `find_clouds` packages each grown region into a
//     `Cloud`; the counting entry points skip that work and only tally seeds.
// 5.  **Stateless Utility**: Nothing survives a call. The input sky is only
//     borrowed, so repeated calls on the same sky always agree.

use crate::core_modules::cloud::Cloud;
use crate::core_modules::error::Result;
use crate::core_modules::sky::{HeatIndex, Point, Sky};

pub mod cloud_detector {
    use super::*;
    use tracing::{debug, trace};

    /// The 4 direct neighbours (not diagonals), as `(dx, dy)`.
    const NEIGHBOURS: [(i64, i64); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

    /// The order in which seeds are searched for. The resulting count never
    /// depends on it; only cloud ids do.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum ScanOrder {
        #[default]
        RowMajor,
        ColumnMajor,
    }

    /// Counts the clouds in a raw grid of readings.
    ///
    /// The grid must be rectangular; ragged rows fail with
    /// `SkyError::InvalidShape` before any traversal happens. An empty grid
    /// has no clouds.
    pub fn count_clouds(grid: &[Vec<HeatIndex>]) -> Result<usize> {
        let sky = Sky::new(grid.to_vec())?;
        Ok(count_sky(&sky))
    }

    /// Counts the clouds in an already validated sky.
    pub fn count_sky(sky: &Sky) -> usize {
        count_sky_in_order(sky, ScanOrder::RowMajor)
    }

    /// Counts the clouds, searching for seeds in the given order.
    pub fn count_sky_in_order(sky: &Sky, order: ScanOrder) -> usize {
        let mut visited = vec![vec![false; sky.width()]; sky.height()];
        let mut count = 0;

        for seed in scan(sky, order) {
            if !is_seed(sky, &visited, seed) {
                continue;
            }
            count += 1;
            let size = flood(sky, &mut visited, seed, |_| {});
            trace!(x = seed.x, y = seed.y, size, "cloud discovered");
        }

        debug!(
            width = sky.width(),
            height = sky.height(),
            ?order,
            clouds = count,
            "sky counted"
        );
        count
    }

    /// Finds every cloud in the sky, in row-major discovery order.
    pub fn find_clouds(sky: &Sky) -> Vec<Cloud> {
        let mut visited = vec![vec![false; sky.width()]; sky.height()];
        let mut clouds: Vec<Cloud> = Vec::new();
        let mut cloud_id_counter = 0;

        for seed in scan(sky, ScanOrder::RowMajor) {
            if !is_seed(sky, &visited, seed) {
                continue;
            }

            let mut cloud_cells: Vec<Point> = Vec::new();
            flood(sky, &mut visited, seed, |point| cloud_cells.push(point));
            clouds.push(aggregate_cloud(sky, cloud_id_counter, cloud_cells));
            cloud_id_counter += 1;
        }

        debug!(clouds = clouds.len(), "clouds found");
        clouds
    }

    /// An unvisited cloud cell starts a new cloud.
    fn is_seed(sky: &Sky, visited: &[Vec<bool>], point: Point) -> bool {
        let (x, y) = (point.x as usize, point.y as usize);
        !visited[y][x] && sky.is_cloud(x, y)
    }

    /// Yields every coordinate of the sky in the requested order.
    fn scan(sky: &Sky, order: ScanOrder) -> Box<dyn Iterator<Item = Point>> {
        let width = sky.width() as u32;
        let height = sky.height() as u32;
        match order {
            ScanOrder::RowMajor => {
                Box::new((0..height).flat_map(move |y| (0..width).map(move |x| Point { x, y })))
            }
            ScanOrder::ColumnMajor => {
                Box::new((0..width).flat_map(move |x| (0..height).map(move |y| Point { x, y })))
            }
        }
    }

    /// Depth-first flood from `seed`, which must be an unvisited cloud cell.
    /// Calls `on_cell` once per cell in the region and returns the region size.
    fn flood(
        sky: &Sky,
        visited: &mut [Vec<bool>],
        seed: Point,
        mut on_cell: impl FnMut(Point),
    ) -> usize {
        let grid_width = sky.width() as i64;
        let grid_height = sky.height() as i64;
        let mut stack: Vec<Point> = vec![seed];
        let mut size = 0;
        visited[seed.y as usize][seed.x as usize] = true;

        while let Some(current) = stack.pop() {
            on_cell(current);
            size += 1;

            for (dx, dy) in NEIGHBOURS {
                let nx = current.x as i64 + dx;
                let ny = current.y as i64 + dy;

                if nx < 0 || nx >= grid_width || ny < 0 || ny >= grid_height {
                    continue;
                }
                let (nx_u, ny_u) = (nx as usize, ny as usize);

                if !visited[ny_u][nx_u] && sky.is_cloud(nx_u, ny_u) {
                    visited[ny_u][nx_u] = true;
                    stack.push(Point {
                        x: nx_u as u32,
                        y: ny_u as u32,
                    });
                }
            }
        }

        size
    }

    fn aggregate_cloud(sky: &Sky, id: u64, mut cells: Vec<Point>) -> Cloud {
        cells.sort_unstable_by_key(|p| (p.y, p.x));

        let mut min_x = u32::MAX;
        let mut min_y = u32::MAX;
        let mut max_x = 0;
        let mut max_y = 0;
        let mut coldest = HeatIndex::MAX;
        let mut total_heat: i64 = 0;

        for point in &cells {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);

            let heat = sky.cells()[point.y as usize * sky.width() + point.x as usize];
            coldest = coldest.min(heat);
            total_heat += i64::from(heat);
        }

        let num_cells = cells.len();
        Cloud {
            id,
            bounding_box: (Point { x: min_x, y: min_y }, Point { x: max_x, y: max_y }),
            cells,
            size_in_cells: num_cells,
            coldest_index: coldest,
            mean_index: total_heat as f64 / num_cells as f64,
        }
    }
}

// The sample skies captured during the first satellite passes, kept as fixtures
// for the `samples` subcommand and the tests. They are callers' data, not part
// of the counter.

use crate::core_modules::sky::{HeatIndex, Sky};

pub const SAMPLE_COUNT: usize = 4;

/// Cloud counts for each sample, in order.
pub const EXPECTED_COUNTS: [usize; SAMPLE_COUNT] = [3, 2, 1, 2];

const PASS_ONE: &[&[HeatIndex]] = &[
    &[9, 9, 5, 2],
    &[8, 8, 1, 5],
    &[8, 8, 8, 8],
    &[9, 9, 9, 4],
];

const PASS_TWO: &[&[HeatIndex]] = &[
    &[9, 8, 7, 4, 4, 3, 3, 2, 5, 9],
    &[6, 6, 2, 3, 4, 4, 7, 8, 8, 9],
    &[8, 7, 7, 8, 9, 9, 7, 7, 6, 5],
    &[8, 4, 4, 3, 8, 8, 9, 9, 8, 7],
    &[5, 4, 3, 2, 8, 8, 9, 8, 8, 7],
];

const PASS_THREE: &[&[HeatIndex]] = &[
    &[9, 8, 7, 4, 6, 7, 3, 2, 5, 9],
    &[6, 6, 2, 3, 4, 4, 4, 8, 8, 9],
];

const PASS_FOUR: &[&[HeatIndex]] = &[&[1, 1, 2, 5, 1]];

const SAMPLES: [&[&[HeatIndex]]; SAMPLE_COUNT] = [PASS_ONE, PASS_TWO, PASS_THREE, PASS_FOUR];

/// Returns the sample sky at `index`, or `None` past the last one.
pub fn sample(index: usize) -> Option<Sky> {
    let rows = SAMPLES.get(index)?;
    // Fixtures are rectangular, so this never fails.
    Sky::new(rows.iter().map(|row| row.to_vec()).collect()).ok()
}

/// All samples in order.
pub fn all() -> Vec<Sky> {
    (0..SAMPLE_COUNT).filter_map(sample).collect()
}

//! Error types for sky construction, loading and surveying.

use thiserror::Error;

/// Everything that can go wrong before a sky is counted.
///
/// Counting itself never fails once a `Sky` exists; all of these are raised
/// while building or loading one.
#[derive(Debug, Error)]
pub enum SkyError {
    /// A row's length differs from the first row's length.
    #[error("invalid sky shape: row {row} has {found} cells, expected {expected}")]
    InvalidShape {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A flat cell buffer does not match the declared dimensions.
    #[error("invalid sky dimensions: {cells} cells do not fill a {width}x{height} sky")]
    InvalidDimensions {
        width: usize,
        height: usize,
        cells: usize,
    },

    /// A token in a text sky is not an integer.
    #[error("parse error on line {line}: `{token}` is not a heat index")]
    Parse { line: usize, token: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A survey worker panicked or was cancelled.
    #[error("survey worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SkyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_shape_names_the_row() {
        let err = SkyError::InvalidShape {
            row: 2,
            expected: 4,
            found: 3,
        };
        assert_eq!(
            err.to_string(),
            "invalid sky shape: row 2 has 3 cells, expected 4"
        );
    }

    #[test]
    fn invalid_dimensions_reports_both_sides() {
        let err = SkyError::InvalidDimensions {
            width: 3,
            height: 2,
            cells: 5,
        };
        assert_eq!(
            err.to_string(),
            "invalid sky dimensions: 5 cells do not fill a 3x2 sky"
        );
    }
}

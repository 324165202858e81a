//! Error types for mathematical operations.

use thiserror::Error;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during mathematical operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Query outside the grid.
    #[error(
        "Extrapolation not allowed: ({x}, {y}) is outside [{x_min}, {x_max}] x [{y_min}, {y_max}]"
    )]
    ExtrapolationNotAllowed {
        /// Query x.
        x: f64,
        /// Query y.
        y: f64,
        /// Lower x bound.
        x_min: f64,
        /// Upper x bound.
        x_max: f64,
        /// Lower y bound.
        y_min: f64,
        /// Upper y bound.
        y_max: f64,
    },

    /// Insufficient data points for operation.
    #[error("Insufficient data: need at least {required}, got {actual}")]
    InsufficientData {
        /// Minimum required points.
        required: usize,
        /// Actual number of points.
        actual: usize,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },

    /// Grid values do not match the axes.
    #[error("Incompatible dimensions: values are ({rows}x{cols}), axes are ({expected_rows}x{expected_cols})")]
    DimensionMismatch {
        /// Rows in the value grid.
        rows: usize,
        /// Columns in the value grid.
        cols: usize,
        /// Expected rows (y axis length).
        expected_rows: usize,
        /// Expected columns (x axis length).
        expected_cols: usize,
    },
}

impl MathError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Returns true for a query outside the grid.
    #[must_use]
    pub fn is_extrapolation(&self) -> bool {
        matches!(self, Self::ExtrapolationNotAllowed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::insufficient_data(2, 1);
        assert!(err.to_string().contains("at least 2"));

        let err = MathError::ExtrapolationNotAllowed {
            x: 6.0,
            y: 0.05,
            x_min: 0.25,
            x_max: 5.0,
            y_min: 0.03,
            y_max: 0.1,
        };
        assert!(err.is_extrapolation());
        assert!(err.to_string().contains("(6, 0.05)"));
    }
}

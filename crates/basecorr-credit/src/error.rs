//! Error types for correlation term structures.

use basecorr_core::CoreError;
use basecorr_math::MathError;
use thiserror::Error;

/// A specialized Result type for correlation operations.
pub type CorrelationResult<T> = Result<T, CorrelationError>;

/// Error types for correlation term structures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrelationError {
    /// Construction inputs or grid state violate an invariant.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the violated invariant.
        reason: String,
    },

    /// Query outside the grid with extrapolation disabled.
    #[error(
        "Extrapolation not allowed: (t={time}, loss={loss_level}) is outside [{}, {}] x [{}, {}]",
        .time_range.0, .time_range.1, .loss_range.0, .loss_range.1
    )]
    ExtrapolationNotAllowed {
        /// Query time in years.
        time: f64,
        /// Query loss level.
        loss_level: f64,
        /// Time span of the grid.
        time_range: (f64, f64),
        /// Loss level span of the grid.
        loss_range: (f64, f64),
    },

    /// Date, calendar, schedule or quote error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Interpolation failure.
    #[error("Interpolation error: {0}")]
    Interpolation(MathError),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of the error.
        reason: String,
    },
}

impl CorrelationError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

impl From<MathError> for CorrelationError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::ExtrapolationNotAllowed {
                x,
                y,
                x_min,
                x_max,
                y_min,
                y_max,
            } => Self::ExtrapolationNotAllowed {
                time: x,
                loss_level: y,
                time_range: (x_min, x_max),
                loss_range: (y_min, y_max),
            },
            MathError::InsufficientData { .. } | MathError::InvalidInput { .. } => Self::InvalidInput {
                reason: err.to_string(),
            },
            MathError::DimensionMismatch { .. } => Self::Interpolation(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_math_errors_are_mapped() {
        let err: CorrelationError = MathError::insufficient_data(2, 1).into();
        assert!(matches!(err, CorrelationError::InvalidInput { .. }));

        let err: CorrelationError = MathError::DimensionMismatch {
            rows: 2,
            cols: 3,
            expected_rows: 3,
            expected_cols: 3,
        }
        .into();
        assert!(matches!(err, CorrelationError::Interpolation(_)));

        let err: CorrelationError = MathError::ExtrapolationNotAllowed {
            x: 6.0,
            y: 0.05,
            x_min: 0.25,
            x_max: 5.0,
            y_min: 0.03,
            y_max: 0.10,
        }
        .into();
        assert_eq!(
            err,
            CorrelationError::ExtrapolationNotAllowed {
                time: 6.0,
                loss_level: 0.05,
                time_range: (0.25, 5.0),
                loss_range: (0.03, 0.10),
            }
        );
    }

    #[test]
    fn test_core_errors_pass_through() {
        let core = CoreError::invalid_quote("quote has no value");
        let err: CorrelationError = core.clone().into();
        assert_eq!(err.to_string(), core.to_string());
    }
}

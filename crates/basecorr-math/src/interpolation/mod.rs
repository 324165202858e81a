//! Axis helpers shared by the 2D schemes.

mod cubic_spline;

pub(crate) use cubic_spline::{natural_second_derivatives, spline_value};

use crate::error::{MathError, MathResult};

/// Checks that an axis has at least `min_points` finite, strictly
/// increasing values.
pub(crate) fn check_axis(name: &str, values: &[f64], min_points: usize) -> MathResult<()> {
    if values.len() < min_points {
        return Err(MathError::insufficient_data(min_points, values.len()));
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(MathError::invalid_input(format!(
            "{name} values must be finite, got {bad}"
        )));
    }
    if let Some(i) = (1..values.len()).find(|&i| values[i] <= values[i - 1]) {
        return Err(MathError::invalid_input(format!(
            "{name} values must be strictly increasing: {} at index {} follows {}",
            values[i],
            i,
            values[i - 1]
        )));
    }
    Ok(())
}

/// Finds the index i such that `xs[i] <= x < xs[i+1]`, clamped to the
/// first and last segments. `xs` needs at least 2 points.
pub(crate) fn find_segment(xs: &[f64], x: f64) -> usize {
    let last = xs.len() - 2;
    match xs.binary_search_by(|knot| knot.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal)) {
        Ok(i) => i.min(last),
        Err(i) => i.saturating_sub(1).min(last),
    }
}

/// Knots bracketing `x` and the linear weight of the upper one.
///
/// A single-point axis is flat: both knots are that point and the weight
/// is zero.
pub(crate) fn bracket(xs: &[f64], x: f64) -> (usize, usize, f64) {
    if xs.len() < 2 {
        return (0, 0, 0.0);
    }
    let i = find_segment(xs, x);
    (i, i + 1, (x - xs[i]) / (xs[i + 1] - xs[i]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_find_segment() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(find_segment(&xs, -1.0), 0);
        assert_eq!(find_segment(&xs, 0.0), 0);
        assert_eq!(find_segment(&xs, 1.5), 1);
        assert_eq!(find_segment(&xs, 3.0), 2);
        assert_eq!(find_segment(&xs, 9.0), 2);
    }

    #[test]
    fn test_check_axis() {
        assert!(check_axis("x", &[0.0, 1.0], 2).is_ok());
        assert!(check_axis("x", &[0.5], 1).is_ok());
        assert!(matches!(
            check_axis("x", &[], 1),
            Err(MathError::InsufficientData { required: 1, actual: 0 })
        ));
        assert!(check_axis("x", &[0.0, 0.0], 1).is_err());
        assert!(check_axis("x", &[0.0, f64::NAN], 1).is_err());
    }

    #[test]
    fn test_bracket() {
        let (i, j, w) = bracket(&[0.0, 1.0, 3.0], 2.0);
        assert_eq!((i, j), (1, 2));
        assert_relative_eq!(w, 0.5);

        let (i, j, w) = bracket(&[0.0, 1.0], -1.0);
        assert_eq!((i, j), (0, 1));
        assert_relative_eq!(w, -1.0);

        assert_eq!(bracket(&[0.25], 7.0), (0, 0, 0.0));
    }
}

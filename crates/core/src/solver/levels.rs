//! Iso-level selection for contour extraction
//!
//! Picks a robust set of travel-time thresholds to contour. Raw field maxima
//! are dominated by a few slow outlier cells near the field edges, so the
//! upper bound is clipped to the 99.99th percentile of the finite values;
//! that keeps contour spacing visually uniform across the bulk of the field.

use tracing::debug;

use crate::error::PipelineError;
use crate::field::TravelTimeField;

/// Default number of contour levels
pub const DEFAULT_LEVEL_COUNT: usize = 300;

/// Percentile used to clip the upper travel-time bound
const UPPER_PERCENTILE: f64 = 99.99;

/// Select `count` evenly spaced contour levels from the finite travel times
///
/// Levels span `[Tmin, T_p99.99]` inclusive; when the percentile collapses
/// onto the minimum the true maximum is used instead.
///
/// # Errors
///
/// - [`PipelineError::EmptyField`] if the field has no finite values
/// - [`PipelineError::DegenerateLevels`] if even the fallback upper bound
///   equals the minimum (constant field), so no increasing sequence exists
pub fn select_levels(
    field: &TravelTimeField,
    count: usize,
) -> Result<Vec<f32>, PipelineError> {
    let mut finite: Vec<f32> = field.finite_values().collect();
    if finite.is_empty() {
        return Err(PipelineError::EmptyField);
    }
    finite.sort_unstable_by(f32::total_cmp);

    let t_min = finite[0];
    let t_max = finite[finite.len() - 1];
    let mut upper = percentile(&finite, UPPER_PERCENTILE);
    if upper <= t_min {
        upper = t_max;
    }
    if upper <= t_min {
        return Err(PipelineError::DegenerateLevels);
    }

    debug!(
        "Selected {} levels over [{}, {}] (max {})",
        count, t_min, upper, t_max
    );

    if count == 0 {
        return Ok(Vec::new());
    }
    if count == 1 {
        return Ok(vec![t_min]);
    }
    let step = (upper - t_min) / (count - 1) as f32;
    let mut levels: Vec<f32> = (0..count).map(|i| t_min + step * i as f32).collect();
    // Pin the last level exactly to the upper bound
    levels[count - 1] = upper;
    Ok(levels)
}

/// Percentile of sorted values with linear interpolation between ranks
fn percentile(sorted: &[f32], q: f64) -> f32 {
    debug_assert!(!sorted.is_empty());
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = (rank - lo as f64) as f32;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn field_from(width: usize, height: usize, data: Vec<f32>) -> TravelTimeField {
        let mut field = TravelTimeField::unreached(width, height);
        for row in 0..height {
            for col in 0..width {
                field.set(row, col, data[row * width + col]);
            }
        }
        field
    }

    #[test]
    fn test_empty_field_is_rejected() {
        let field = TravelTimeField::unreached(4, 4);
        assert_eq!(select_levels(&field, 10).unwrap_err(), PipelineError::EmptyField);
    }

    #[test]
    fn test_constant_field_is_degenerate() {
        let field = field_from(3, 3, vec![2.0; 9]);
        assert_eq!(
            select_levels(&field, 10).unwrap_err(),
            PipelineError::DegenerateLevels
        );
    }

    #[test]
    fn test_exact_count_and_strictly_increasing() {
        let data: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let field = field_from(10, 10, data);
        for count in [2, 7, 300] {
            let levels = select_levels(&field, count).unwrap();
            assert_eq!(levels.len(), count);
            for pair in levels.windows(2) {
                assert!(pair[1] > pair[0], "levels must strictly increase");
            }
        }
    }

    #[test]
    fn test_span_is_min_to_percentile() {
        let data: Vec<f32> = (0..10_000).map(|i| i as f32).collect();
        let field = field_from(100, 100, data);
        let levels = select_levels(&field, 300).unwrap();
        assert_eq!(levels[0], 0.0);
        // 99.99th percentile of 0..=9999 with linear interpolation
        assert_relative_eq!(levels[299], 9998.0001, max_relative = 1e-5);
        assert!(levels[299] < 9999.0, "outlier maximum must be clipped");
    }

    #[test]
    fn test_small_field_falls_back_to_maximum() {
        // With few values the percentile interpolates close to the max;
        // with exactly two values spanning a range it must still work
        let mut field = TravelTimeField::unreached(2, 2);
        field.set(0, 0, 1.0);
        field.set(0, 1, 5.0);
        let levels = select_levels(&field, 5).unwrap();
        assert_eq!(levels.len(), 5);
        assert_eq!(levels[0], 1.0);
        assert!(levels[4] <= 5.0);
        assert!(levels[4] > 1.0);
    }

    #[test]
    fn test_ignores_unreached_cells() {
        let mut field = TravelTimeField::unreached(1, 3);
        field.set(0, 0, 1.0);
        field.set(1, 0, 3.0);
        // (2, 0) stays +∞ and must not poison the bounds
        let levels = select_levels(&field, 3).unwrap();
        assert!(levels.iter().all(|l| l.is_finite()));
        assert_eq!(levels[0], 1.0);
    }

    #[test]
    fn test_default_level_count() {
        assert_eq!(DEFAULT_LEVEL_COUNT, 300);
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        let sorted = vec![0.0, 10.0];
        assert_relative_eq!(percentile(&sorted, 50.0), 5.0);
        assert_relative_eq!(percentile(&sorted, 99.99), 9.999, max_relative = 1e-5);
        assert_eq!(percentile(&sorted, 100.0), 10.0);
    }
}

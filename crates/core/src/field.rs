//! Scalar field containers for the contour pipeline
//!
//! This module defines the 2D grid types the pipeline passes between stages:
//! a generic row-major [`ScalarField`], the normalized [`SpeedField`] the
//! solver reads, and the [`TravelTimeField`] it produces.
//!
//! # Coordinate convention
//!
//! Grid coordinates are `(row, col)`, 0-indexed, with rows growing downward
//! and columns growing rightward. Storage is row-major (`row * width + col`).

/// Smallest admissible propagation speed.
///
/// A speed of zero means infinite cost and would divide by zero in the
/// solver's upwind update, so brightness values are clamped to this floor
/// when a [`SpeedField`] is constructed.
pub const MIN_SPEED: f32 = 1e-6;

/// Grid cell coordinate: `(row, col)`, 0-indexed, row-down, col-right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Row index (0 at the top of the image)
    pub row: usize,
    /// Column index (0 at the left of the image)
    pub col: usize,
}

impl Cell {
    /// Create a cell coordinate
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// 2D scalar field stored as a flat `Vec<f32>` in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    /// Field values in row-major order (`row * width + col`)
    data: Vec<f32>,
    /// Grid width in cells
    width: usize,
    /// Grid height in cells
    height: usize,
}

impl ScalarField {
    /// Create a field of the given dimensions filled with `value`
    #[must_use]
    pub fn with_value(width: usize, height: usize, value: f32) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    /// Create a field from existing row-major data
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != width * height`.
    #[must_use]
    pub fn from_data(width: usize, height: usize, data: Vec<f32>) -> Self {
        assert_eq!(
            data.len(),
            width * height,
            "Data length must match dimensions"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// Grid width in cells
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Whether the field has zero cells
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether `cell` lies within the field bounds
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Flat row-major index of `(row, col)`
    #[must_use]
    pub const fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        assert!(
            row < self.height && col < self.width,
            "Coordinates out of bounds"
        );
        self.data[self.index(row, col)]
    }

    /// Set value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        assert!(
            row < self.height && col < self.width,
            "Coordinates out of bounds"
        );
        let idx = self.index(row, col);
        self.data[idx] = value;
    }

    /// Reference to the raw row-major data
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mutable reference to the raw row-major data
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Mean of all values (0.0 for an empty field)
    #[must_use]
    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.data.iter().map(|&v| f64::from(v)).sum();
        (sum / self.data.len() as f64) as f32
    }
}

/// Normalized propagation speed per cell, values in `[MIN_SPEED, 1]`
///
/// Produced once by preprocessing and consumed read-only by the solver.
/// Construction clamps every value into the valid range, so a zero (infinite
/// cost) brightness can never reach the solver.
#[derive(Debug, Clone)]
pub struct SpeedField {
    field: ScalarField,
}

impl SpeedField {
    /// Build a speed field from normalized brightness, clamping into
    /// `[MIN_SPEED, 1]`
    #[must_use]
    pub fn from_brightness(mut field: ScalarField) -> Self {
        for v in field.as_mut_slice() {
            *v = v.clamp(MIN_SPEED, 1.0);
        }
        Self { field }
    }

    /// Grid width in cells
    #[must_use]
    pub const fn width(&self) -> usize {
        self.field.width()
    }

    /// Grid height in cells
    #[must_use]
    pub const fn height(&self) -> usize {
        self.field.height()
    }

    /// Whether the field has zero cells
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.field.is_empty()
    }

    /// Speed at grid position, guaranteed positive
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.field.get(row, col)
    }
}

/// Minimal travel time from the seed set to each cell
///
/// `f32::INFINITY` marks cells the wavefront never reached. The field is
/// mutated only by the solver during its run; afterwards it is shared
/// read-only by level selection and contour tracing.
#[derive(Debug, Clone)]
pub struct TravelTimeField {
    field: ScalarField,
}

impl TravelTimeField {
    /// Create a field with every cell unreached (+∞)
    #[must_use]
    pub fn unreached(width: usize, height: usize) -> Self {
        Self {
            field: ScalarField::with_value(width, height, f32::INFINITY),
        }
    }

    /// Grid width in cells
    #[must_use]
    pub const fn width(&self) -> usize {
        self.field.width()
    }

    /// Grid height in cells
    #[must_use]
    pub const fn height(&self) -> usize {
        self.field.height()
    }

    /// Travel time at grid position (+∞ if unreached)
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.field.get(row, col)
    }

    /// Set travel time at grid position
    pub(crate) fn set(&mut self, row: usize, col: usize, value: f32) {
        self.field.set(row, col, value);
    }

    /// Iterator over the finite (reached) travel times
    pub fn finite_values(&self) -> impl Iterator<Item = f32> + '_ {
        self.field.as_slice().iter().copied().filter(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_creation() {
        let field = ScalarField::with_value(10, 20, 0.0);
        assert_eq!(field.width(), 10);
        assert_eq!(field.height(), 20);
        assert_eq!(field.as_slice().len(), 200);
        assert!(field.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_field_get_set_row_major() {
        let mut field = ScalarField::with_value(10, 10, 0.0);
        field.set(4, 3, 123.45);
        assert_eq!(field.get(4, 3), 123.45);

        // Verify row-major indexing
        assert_eq!(field.index(4, 3), 4 * 10 + 3);
        assert_eq!(field.as_slice()[field.index(4, 3)], 123.45);
    }

    #[test]
    #[should_panic(expected = "Coordinates out of bounds")]
    fn test_field_bounds_check() {
        let field = ScalarField::with_value(10, 10, 0.0);
        let _ = field.get(5, 10); // col out of bounds
    }

    #[test]
    fn test_field_mean() {
        let field = ScalarField::from_data(2, 2, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(field.mean(), 1.5);
    }

    #[test]
    fn test_speed_field_clamps_zero() {
        let raw = ScalarField::from_data(2, 1, vec![0.0, 1.5]);
        let speed = SpeedField::from_brightness(raw);
        assert_eq!(speed.get(0, 0), MIN_SPEED);
        assert_eq!(speed.get(0, 1), 1.0);
    }

    #[test]
    fn test_travel_time_starts_unreached() {
        let tt = TravelTimeField::unreached(3, 3);
        assert!(tt.get(1, 1).is_infinite());
        assert_eq!(tt.finite_values().count(), 0);
    }

    #[test]
    fn test_travel_time_finite_values() {
        let mut tt = TravelTimeField::unreached(2, 2);
        tt.set(0, 0, 0.0);
        tt.set(1, 1, 2.5);
        let mut finite: Vec<f32> = tt.finite_values().collect();
        finite.sort_by(f32::total_cmp);
        assert_eq!(finite, vec![0.0, 2.5]);
    }

    #[test]
    fn test_cell_contains() {
        let field = ScalarField::with_value(4, 3, 0.0);
        assert!(field.contains(Cell::new(2, 3)));
        assert!(!field.contains(Cell::new(3, 0)));
        assert!(!field.contains(Cell::new(0, 4)));
    }
}

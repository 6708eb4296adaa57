//! Numerical core: eikonal solve, level selection, isoline extraction
//!
//! The stages compose as a pure function of the speed field:
//! [`eikonal::solve`] produces the travel-time field,
//! [`levels::select_levels`] picks the iso-values worth drawing, and
//! [`marching_squares::trace`] extracts each iso-value as polylines.
//!
//! The solve is inherently sequential (each frozen cell depends on all
//! earlier ones); tracing different levels is embarrassingly parallel over
//! the then-immutable travel-time field and is parallelized in the pipeline.

pub mod eikonal;
pub mod levels;
pub mod marching_squares;

// Re-exports
pub use eikonal::{solve, solve_observed};
pub use levels::{select_levels, DEFAULT_LEVEL_COUNT};
pub use marching_squares::{trace, Point2, Polyline, CHAIN_TOLERANCE};

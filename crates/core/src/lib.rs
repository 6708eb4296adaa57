//! Isochrone Core Library
//!
//! Converts a photographic image into a single-stroke-style line drawing
//! rendered as SVG contours. Image brightness becomes a propagation speed
//! field, a wavefront expands from the image center via the Fast Marching
//! Method, and isochrones of the resulting travel-time field are traced
//! with marching squares and emitted as vector paths.
//!
//! ## Pipeline stages
//!
//! - Preprocessing: Gaussian blur, contrast, brightness, optional gamma
//! - Eikonal solve: priority-driven fast marching over the speed field
//! - Level selection: percentile-clipped, evenly spaced iso-values
//! - Contour tracing: marching squares with watertight polyline chaining
//! - Emission/packaging: path commands, bbox-trimmed SVG document

// Field containers and grid coordinates
pub mod field;

// Preprocessing filters and named presets
pub mod preprocess;

// Numerical core: eikonal solve, level selection, isoline extraction
pub mod solver;

// Path emission and SVG packaging
pub mod path;
pub mod svg;

// End-to-end orchestration
pub mod pipeline;

pub mod error;

// Re-export the pipeline surface
pub use error::PipelineError;
pub use field::{Cell, ScalarField, SpeedField, TravelTimeField, MIN_SPEED};
pub use path::{emit, LevelContours, LevelPath, PathCommand, PathDocument};
pub use pipeline::{run, PipelineOptions};
pub use preprocess::{preprocess, Preset, PresetConfig};
pub use solver::{select_levels, solve, solve_observed, trace, Point2, Polyline};
pub use svg::render_svg;

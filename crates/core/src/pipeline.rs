//! End-to-end pipeline: grayscale image to SVG line drawing
//!
//! Composes the stages in order: preprocessing builds the speed field, the
//! eikonal solve propagates a wavefront from the image center, level
//! selection picks the isochrones worth drawing, marching squares traces
//! them, and the emitter/packager produce the SVG document.
//!
//! The solve is sequential; per-level tracing reads the then-immutable
//! travel-time field and runs on the rayon thread pool. The whole run is a
//! pure function of its inputs: any stage failure aborts the run with a
//! single error and no partial output.

use rayon::prelude::*;
use tracing::info;

use crate::error::PipelineError;
use crate::field::{Cell, ScalarField};
use crate::path::{emit, LevelContours};
use crate::preprocess::{preprocess, Preset};
use crate::solver::levels::{select_levels, DEFAULT_LEVEL_COUNT};
use crate::solver::{eikonal, marching_squares};
use crate::svg::render_svg;

/// Options for one pipeline run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    /// Preprocessing preset
    pub preset: Preset,
    /// Number of contour levels to draw
    pub level_count: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            preset: Preset::A,
            level_count: DEFAULT_LEVEL_COUNT,
        }
    }
}

/// Run the full pipeline on a normalized grayscale image
///
/// `gray` holds brightness in `[0, 1]`, row 0 at the top of the image.
/// The wavefront is seeded at the single center cell `(H/2, W/2)`.
///
/// # Errors
///
/// Propagates [`PipelineError`] from any stage: invalid input dimensions,
/// an empty travel-time field, or degenerate level selection.
pub fn run(gray: &ScalarField, options: &PipelineOptions) -> Result<String, PipelineError> {
    if gray.is_empty() {
        return Err(PipelineError::InvalidInput(
            "input image has zero pixels".to_string(),
        ));
    }
    let width = gray.width();
    let height = gray.height();
    info!(
        "Running pipeline on {}x{} image, preset {}, {} levels",
        width,
        height,
        options.preset.name(),
        options.level_count
    );

    let speed = preprocess(gray, &options.preset.config());
    let seed = Cell::new(height / 2, width / 2);
    let times = eikonal::solve(&speed, &[seed])?;
    let levels = select_levels(&times, options.level_count)?;

    let contours: Vec<LevelContours> = levels
        .par_iter()
        .map(|&level| LevelContours {
            level,
            polylines: marching_squares::trace(&times, level),
        })
        .collect();

    let traced: usize = contours.iter().map(|c| c.polylines.len()).sum();
    info!("Traced {} polylines across {} levels", traced, levels.len());

    let doc = emit(&contours, width, height);
    Ok(render_svg(&doc))
}

//! Fast Marching Method solver for the eikonal equation
//!
//! Computes the minimal travel time `T` of a wavefront expanding from a seed
//! set over a positive speed field, solving `|∇T| = 1/speed` on the grid.
//!
//! # Algorithm
//!
//! Cells move through three states, never backward:
//! - `Far`: untouched, time +∞
//! - `Narrow`: tentative time computed, pending finalization
//! - `Frozen`: time finalized, immutable thereafter
//!
//! The narrow band is kept in a binary min-heap. Each iteration freezes the
//! narrow cell with the globally smallest tentative time and relaxes its
//! 4-connected neighbors with the upwind finite-difference update. Because
//! speeds are positive, no later update can undercut an already frozen cell,
//! so freeze order is monotone non-decreasing in time.
//!
//! Heap entries are never updated in place; a relaxed cell is re-pushed and
//! stale entries are skipped on extraction. Ties on tentative time break by
//! insertion sequence number, which makes extraction order (and therefore
//! downstream polyline ordering) reproducible across runs.
//!
//! # Complexity
//!
//! O(HW log(HW)) driven by the heap.
//!
//! # References
//!
//! - Sethian (1999) "Level Set Methods and Fast Marching Methods"

use std::collections::BinaryHeap;

use tracing::debug;

use crate::error::PipelineError;
use crate::field::{Cell, SpeedField, TravelTimeField};

/// Solver-internal cell state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellState {
    /// Untouched, time +∞
    Far,
    /// Tentative time computed, tracked in the heap
    Narrow,
    /// Time finalized, immutable
    Frozen,
}

/// Heap entry for a narrow-band cell
///
/// Ordered so the smallest tentative time is extracted first from Rust's
/// max-heap, with ties broken by insertion sequence (earlier wins).
#[derive(Debug, Clone, Copy)]
struct NarrowEntry {
    time: f32,
    seq: u64,
    index: usize,
}

impl PartialEq for NarrowEntry {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for NarrowEntry {}

impl Ord for NarrowEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NarrowEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Compute the travel-time field from `seeds` over `speed`
///
/// # Arguments
///
/// * `speed` - Positive propagation speed per cell
/// * `seeds` - Cells where the wavefront starts at time 0
///
/// # Errors
///
/// Returns [`PipelineError::InvalidInput`] if the speed field has zero
/// cells, or `seeds` is empty or contains out-of-bounds cells.
pub fn solve(speed: &SpeedField, seeds: &[Cell]) -> Result<TravelTimeField, PipelineError> {
    solve_observed(speed, seeds, |_, _| {})
}

/// [`solve`] with a callback invoked at every freeze, in freeze order
///
/// The callback receives the cell and its final time. Used by tests to
/// verify wavefront monotonicity without exposing solver internals.
///
/// # Errors
///
/// Same conditions as [`solve`].
pub fn solve_observed(
    speed: &SpeedField,
    seeds: &[Cell],
    mut on_freeze: impl FnMut(Cell, f32),
) -> Result<TravelTimeField, PipelineError> {
    if speed.is_empty() {
        return Err(PipelineError::InvalidInput(
            "speed field has zero cells".to_string(),
        ));
    }
    if seeds.is_empty() {
        return Err(PipelineError::InvalidInput("seed set is empty".to_string()));
    }
    let width = speed.width();
    let height = speed.height();
    for seed in seeds {
        if seed.row >= height || seed.col >= width {
            return Err(PipelineError::InvalidInput(format!(
                "seed ({}, {}) outside {}x{} field",
                seed.row, seed.col, height, width
            )));
        }
    }

    let mut times = TravelTimeField::unreached(width, height);
    let mut state = vec![CellState::Far; width * height];
    let mut heap: BinaryHeap<NarrowEntry> = BinaryHeap::new();
    let mut seq: u64 = 0;

    for seed in seeds {
        let idx = seed.row * width + seed.col;
        if state[idx] == CellState::Frozen {
            continue; // duplicate seed
        }
        times.set(seed.row, seed.col, 0.0);
        state[idx] = CellState::Frozen;
        on_freeze(*seed, 0.0);
    }

    // Seed the narrow band from the frozen seeds' neighbors
    for seed in seeds {
        relax_neighbors(
            speed, &mut times, &mut state, &mut heap, &mut seq, seed.row, seed.col,
        );
    }

    let mut frozen_count = seeds.len();
    while let Some(entry) = heap.pop() {
        let idx = entry.index;
        if state[idx] == CellState::Frozen {
            continue;
        }
        let row = idx / width;
        let col = idx % width;
        if entry.time > times.get(row, col) {
            continue; // stale entry, a cheaper path was pushed later
        }

        state[idx] = CellState::Frozen;
        frozen_count += 1;
        on_freeze(Cell::new(row, col), entry.time);

        relax_neighbors(
            speed, &mut times, &mut state, &mut heap, &mut seq, row, col,
        );
    }

    debug!(
        "Fast marching frozen {}/{} cells",
        frozen_count,
        width * height
    );
    Ok(times)
}

/// Recompute tentative times for the non-frozen 4-connected neighbors of
/// `(row, col)` and push improvements onto the heap
fn relax_neighbors(
    speed: &SpeedField,
    times: &mut TravelTimeField,
    state: &mut [CellState],
    heap: &mut BinaryHeap<NarrowEntry>,
    seq: &mut u64,
    row: usize,
    col: usize,
) {
    let width = speed.width();
    let height = speed.height();

    let neighbors = [
        (row.wrapping_sub(1), col),
        (row + 1, col),
        (row, col.wrapping_sub(1)),
        (row, col + 1),
    ];
    for (nrow, ncol) in neighbors {
        if nrow >= height || ncol >= width {
            continue;
        }
        let nidx = nrow * width + ncol;
        if state[nidx] == CellState::Frozen {
            continue;
        }

        let tentative = upwind_time(times, state, speed, nrow, ncol);
        if tentative < times.get(nrow, ncol) {
            times.set(nrow, ncol, tentative);
            state[nidx] = CellState::Narrow;
            heap.push(NarrowEntry {
                time: tentative,
                seq: *seq,
                index: nidx,
            });
            *seq += 1;
        }
    }
}

/// Upwind finite-difference solution of the eikonal equation at one cell
///
/// With `Tx` the smaller frozen horizontal neighbor time, `Ty` the smaller
/// frozen vertical neighbor time, and local speed `s` (grid spacing 1):
/// solve `(T - Tx)² + (T - Ty)² = (1/s)²` when both are finite and
/// `|Tx - Ty| < 1/s`, taking the root that exceeds both neighbor times;
/// otherwise fall back to the 1D update `min(Tx, Ty) + 1/s`.
fn upwind_time(
    times: &TravelTimeField,
    state: &[CellState],
    speed: &SpeedField,
    row: usize,
    col: usize,
) -> f32 {
    let width = speed.width();
    let height = speed.height();

    let frozen_time = |r: usize, c: usize| -> f32 {
        if r < height && c < width && state[r * width + c] == CellState::Frozen {
            times.get(r, c)
        } else {
            f32::INFINITY
        }
    };

    let tx = frozen_time(row, col.wrapping_sub(1)).min(frozen_time(row, col + 1));
    let ty = frozen_time(row.wrapping_sub(1), col).min(frozen_time(row + 1, col));

    let inv_s = 1.0 / speed.get(row, col);

    if tx.is_finite() && ty.is_finite() && (tx - ty).abs() < inv_s {
        // Proper 2D upwind case: larger quadratic root exceeds both
        // neighbor times, matching causality of the expanding front
        let diff = tx - ty;
        0.5 * (tx + ty + (2.0 * inv_s * inv_s - diff * diff).sqrt())
    } else {
        tx.min(ty) + inv_s
    }
}

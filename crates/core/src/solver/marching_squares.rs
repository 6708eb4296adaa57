//! Marching squares isoline extraction
//!
//! Extracts the isoline of a travel-time field at a given level as a set of
//! open or closed polylines in grid space.
//!
//! # Algorithm
//!
//! A row-major sweep forms (H-1)×(W-1) unit cells from 4 corner samples.
//! Each corner is classified against the level (inside iff value < level),
//! giving a 4-bit case; crossed edges are interpolated linearly to sub-cell
//! precision and each case emits zero, one, or two line segments. Cells with
//! any non-finite corner are skipped, so contours never cross unreached
//! regions.
//!
//! The saddle cases (5 and 10) are disambiguated by comparing the average
//! corner value against the level, always picking the same diagonal pairing
//! to avoid topological flips.
//!
//! Segments are then chained into polylines by matching shared endpoints.
//! Points on a shared cell edge are produced by the identical interpolation
//! expression in both adjacent cells, so endpoint matching uses quantized
//! hash keys rather than a distance search. Chains that return to their
//! starting point are marked closed and rotated to start at their
//! lexicographically smallest point; open chains keep the deterministic
//! orientation of the sweep. Polylines are reported in the order their first
//! segment was discovered.

use rustc_hash::FxHashMap;

use crate::field::TravelTimeField;

/// Endpoint matching tolerance in grid units
pub const CHAIN_TOLERANCE: f32 = 1e-4;

/// Point in grid space: `x` along columns, `y` along rows, sub-cell precision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    /// Column coordinate, in `[0, W-1]`
    pub x: f32,
    /// Row coordinate, in `[0, H-1]`
    pub y: f32,
}

impl Point2 {
    /// Create a point
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Ordered sequence of points forming one isoline component
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    /// Points in connection order
    pub points: Vec<Point2>,
    /// Whether the chain returned to its starting point
    pub closed: bool,
}

impl Polyline {
    /// Number of points
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the polyline has no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One undirected line segment emitted by a marching-squares cell
type Segment = (Point2, Point2);

/// Extract the isolines of `field` at `level`
///
/// Returns zero polylines when the level lies strictly outside the range of
/// the field's finite values.
#[must_use]
pub fn trace(field: &TravelTimeField, level: f32) -> Vec<Polyline> {
    let width = field.width();
    let height = field.height();
    if width < 2 || height < 2 || !level.is_finite() {
        return Vec::new();
    }

    let mut segments: Vec<Segment> = Vec::new();
    for row in 0..height - 1 {
        for col in 0..width - 1 {
            let tl = field.get(row, col);
            let tr = field.get(row, col + 1);
            let br = field.get(row + 1, col + 1);
            let bl = field.get(row + 1, col);
            if !(tl.is_finite() && tr.is_finite() && br.is_finite() && bl.is_finite()) {
                continue;
            }
            emit_cell_segments(&mut segments, row, col, level, (tl, tr, br, bl));
        }
    }

    chain_segments(&segments)
}

/// Interpolated crossing offset along an edge from value `a` to value `b`
///
/// Callers only invoke this for crossed edges, where `a` and `b` straddle
/// the level and are therefore distinct.
fn crossing(a: f32, b: f32, level: f32) -> f32 {
    (level - a) / (b - a)
}

/// Classify one unit cell and append its contour segments
///
/// Corner order is `(tl, tr, br, bl)` with `tl` at `(row, col)`. A corner
/// is inside iff its value is below the level.
fn emit_cell_segments(
    segments: &mut Vec<Segment>,
    row: usize,
    col: usize,
    level: f32,
    corners: (f32, f32, f32, f32),
) {
    let (tl, tr, br, bl) = corners;
    let case = u8::from(tl < level)
        | (u8::from(tr < level) << 1)
        | (u8::from(br < level) << 2)
        | (u8::from(bl < level) << 3);
    if case == 0 || case == 15 {
        return;
    }

    let x = col as f32;
    let y = row as f32;

    // Crossing points on each cell edge, valid only where the case says
    // the edge is crossed
    let top = || Point2::new(x + crossing(tl, tr, level), y);
    let right = || Point2::new(x + 1.0, y + crossing(tr, br, level));
    let bottom = || Point2::new(x + crossing(bl, br, level), y + 1.0);
    let left = || Point2::new(x, y + crossing(tl, bl, level));

    match case {
        1 | 14 => segments.push((top(), left())),
        2 | 13 => segments.push((top(), right())),
        3 | 12 => segments.push((left(), right())),
        4 | 11 => segments.push((right(), bottom())),
        6 | 9 => segments.push((top(), bottom())),
        7 | 8 => segments.push((left(), bottom())),
        5 => {
            // Saddle: tl and br inside. The cell average decides whether
            // the inside regions connect across the center.
            if (tl + tr + br + bl) * 0.25 < level {
                segments.push((top(), right()));
                segments.push((left(), bottom()));
            } else {
                segments.push((top(), left()));
                segments.push((right(), bottom()));
            }
        }
        10 => {
            // Saddle: tr and bl inside
            if (tl + tr + br + bl) * 0.25 < level {
                segments.push((top(), left()));
                segments.push((right(), bottom()));
            } else {
                segments.push((top(), right()));
                segments.push((left(), bottom()));
            }
        }
        _ => unreachable!("cases 0 and 15 return early"),
    }
}

/// Quantized hash key for endpoint matching
fn endpoint_key(p: Point2) -> (i64, i64) {
    (
        (f64::from(p.x) / f64::from(CHAIN_TOLERANCE)).round() as i64,
        (f64::from(p.y) / f64::from(CHAIN_TOLERANCE)).round() as i64,
    )
}

/// Chain raw segments into polylines by shared-endpoint matching
fn chain_segments(segments: &[Segment]) -> Vec<Polyline> {
    let mut at_endpoint: FxHashMap<(i64, i64), Vec<usize>> = FxHashMap::default();
    for (i, (a, b)) in segments.iter().enumerate() {
        at_endpoint.entry(endpoint_key(*a)).or_default().push(i);
        at_endpoint.entry(endpoint_key(*b)).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut polylines = Vec::new();

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let (a, b) = segments[start];
        let mut points = std::collections::VecDeque::from([a, b]);
        let mut closed = false;

        // Grow forward from the tail, then backward from the head
        loop {
            let tail = *points.back().unwrap_or(&b);
            match take_continuation(segments, &at_endpoint, &mut used, tail) {
                Some(next) => {
                    if endpoint_key(next) == endpoint_key(points[0]) {
                        closed = true;
                        break;
                    }
                    points.push_back(next);
                }
                None => break,
            }
        }
        if !closed {
            loop {
                let head = points[0];
                match take_continuation(segments, &at_endpoint, &mut used, head) {
                    Some(next) => points.push_front(next),
                    None => break,
                }
            }
        }

        let mut points: Vec<Point2> = points.into();
        if closed {
            rotate_to_lexicographic_min(&mut points);
        }
        polylines.push(Polyline { points, closed });
    }

    polylines
}

/// Claim the first unused segment touching `point` and return its far end
fn take_continuation(
    segments: &[Segment],
    at_endpoint: &FxHashMap<(i64, i64), Vec<usize>>,
    used: &mut [bool],
    point: Point2,
) -> Option<Point2> {
    let key = endpoint_key(point);
    for &i in at_endpoint.get(&key)? {
        if used[i] {
            continue;
        }
        let (a, b) = segments[i];
        used[i] = true;
        return Some(if endpoint_key(a) == key { b } else { a });
    }
    None
}

/// Rotate a closed chain so it starts at its lexicographically smallest
/// point (x before y), making closed-loop output reproducible
fn rotate_to_lexicographic_min(points: &mut [Point2]) {
    let Some(min_idx) = (0..points.len()).min_by(|&i, &j| {
        points[i]
            .x
            .total_cmp(&points[j].x)
            .then_with(|| points[i].y.total_cmp(&points[j].y))
    }) else {
        return;
    };
    points.rotate_left(min_idx);
}

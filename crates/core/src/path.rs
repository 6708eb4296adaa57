//! Vector path emission
//!
//! Converts traced polylines into path commands in a declared canvas frame.
//! This is the only stage that fixes image orientation: solver and tracer
//! work in array index space with rows growing downward, and the emitter
//! maps that onto the y-down canvas so row 0 lands at the top of the image,
//! matching standard image coordinate conventions. No stage before or after
//! touches orientation again.

use crate::solver::marching_squares::{Point2, Polyline};

/// Polylines traced at one travel-time level
///
/// The level value is retained through emission for traceability even
/// though rendering only needs the geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelContours {
    /// The travel-time threshold these polylines were traced at
    pub level: f32,
    /// Polylines belonging to this level, in discovery order
    pub polylines: Vec<Polyline>,
}

/// One vector path command in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start a new subpath at the point
    MoveTo(Point2),
    /// Straight line to the point
    LineTo(Point2),
    /// Close the current subpath back to its start
    ClosePath,
}

/// Path commands for one level, tagged with the level value
#[derive(Debug, Clone, PartialEq)]
pub struct LevelPath {
    /// The travel-time threshold this path was traced at
    pub level: f32,
    /// Subpath commands, one [`PathCommand::MoveTo`] per polyline
    pub commands: Vec<PathCommand>,
}

/// Emitted path geometry plus its declared coordinate frame
#[derive(Debug, Clone, PartialEq)]
pub struct PathDocument {
    /// Canvas width: grid width minus one (cells span corner samples)
    pub width: f32,
    /// Canvas height: grid height minus one
    pub height: f32,
    /// Per-level paths, in level order
    pub levels: Vec<LevelPath>,
}

impl PathDocument {
    /// Iterator over every point referenced by any command
    pub fn points(&self) -> impl Iterator<Item = Point2> + '_ {
        self.levels
            .iter()
            .flat_map(|l| &l.commands)
            .filter_map(|cmd| match cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(*p),
                PathCommand::ClosePath => None,
            })
    }

    /// Tight bounding box of the content as `(min, max)`, or `None` when
    /// the document has no points
    #[must_use]
    pub fn bounding_box(&self) -> Option<(Point2, Point2)> {
        let mut points = self.points();
        let first = points.next()?;
        let mut min = first;
        let mut max = first;
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some((min, max))
    }
}

/// Emit path commands for the traced levels of a `field_width` ×
/// `field_height` grid
///
/// Each polyline becomes an independent subpath; closed polylines get a
/// trailing [`PathCommand::ClosePath`]. Grid `(x, y)` maps directly onto
/// the y-down canvas, placing row 0 at the top edge.
#[must_use]
pub fn emit(levels: &[LevelContours], field_width: usize, field_height: usize) -> PathDocument {
    let mut out_levels = Vec::with_capacity(levels.len());
    for contours in levels {
        let mut commands = Vec::new();
        for polyline in &contours.polylines {
            let mut points = polyline.points.iter();
            let Some(first) = points.next() else {
                continue;
            };
            commands.push(PathCommand::MoveTo(*first));
            for p in points {
                commands.push(PathCommand::LineTo(*p));
            }
            if polyline.closed {
                commands.push(PathCommand::ClosePath);
            }
        }
        out_levels.push(LevelPath {
            level: contours.level,
            commands,
        });
    }

    PathDocument {
        width: field_width.saturating_sub(1) as f32,
        height: field_height.saturating_sub(1) as f32,
        levels: out_levels,
    }
}

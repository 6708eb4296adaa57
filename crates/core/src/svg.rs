//! SVG document packaging
//!
//! Wraps emitted path geometry into a complete SVG document. The `viewBox` is
//! trimmed to the content's tight bounding box and the declared pixel size
//! equals the trimmed box, preserving the source image's aspect ratio.
//! Styling is fixed: no fill, uniform black stroke.

use std::fmt::Write as _;

use crate::path::{PathCommand, PathDocument};

/// Uniform stroke width in canvas units
const STROKE_WIDTH: f32 = 1.0;

/// Render a path document as a standalone SVG string
///
/// One `<path>` element is written per level, so the level grouping
/// survives into the output. An empty document yields a valid SVG with the
/// untrimmed canvas frame and no paths.
#[must_use]
pub fn render_svg(doc: &PathDocument) -> String {
    let (origin_x, origin_y, view_width, view_height) = match doc.bounding_box() {
        Some((min, max)) => (min.x, min.y, max.x - min.x, max.y - min.y),
        None => (0.0, 0.0, doc.width, doc.height),
    };

    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" \
         width=\"{view_width:.2}\" height=\"{view_height:.2}\" \
         viewBox=\"{origin_x:.2} {origin_y:.2} {view_width:.2} {view_height:.2}\">\n"
    );
    let _ = write!(
        svg,
        "<g fill=\"none\" stroke=\"black\" stroke-width=\"{STROKE_WIDTH}\">\n"
    );

    for level in &doc.levels {
        if level.commands.is_empty() {
            continue;
        }
        svg.push_str("<path d=\"");
        for command in &level.commands {
            match command {
                PathCommand::MoveTo(p) => {
                    let _ = write!(svg, "M{:.3} {:.3}", p.x, p.y);
                }
                PathCommand::LineTo(p) => {
                    let _ = write!(svg, "L{:.3} {:.3}", p.x, p.y);
                }
                PathCommand::ClosePath => svg.push('Z'),
            }
        }
        svg.push_str("\"/>\n");
    }

    svg.push_str("</g>\n</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{emit, LevelContours};
    use crate::solver::marching_squares::{Point2, Polyline};

    fn sample_doc() -> PathDocument {
        let levels = [
            LevelContours {
                level: 1.0,
                polylines: vec![Polyline {
                    points: vec![Point2::new(2.0, 3.0), Point2::new(5.0, 3.0)],
                    closed: false,
                }],
            },
            LevelContours {
                level: 2.0,
                polylines: vec![Polyline {
                    points: vec![
                        Point2::new(3.0, 2.0),
                        Point2::new(4.0, 3.0),
                        Point2::new(3.0, 4.0),
                    ],
                    closed: true,
                }],
            },
        ];
        emit(&levels, 11, 11)
    }

    #[test]
    fn test_svg_structure() {
        let svg = render_svg(&sample_doc());
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains("fill=\"none\""));
        assert!(svg.contains("stroke=\"black\""));
        assert!(svg.ends_with("</svg>\n"));
        assert_eq!(svg.matches("<path").count(), 2);
    }

    #[test]
    fn test_viewbox_is_trimmed_to_content() {
        let svg = render_svg(&sample_doc());
        // Content spans x 2..5, y 2..4
        assert!(svg.contains("viewBox=\"2.00 2.00 3.00 2.00\""), "{svg}");
        assert!(svg.contains("width=\"3.00\" height=\"2.00\""), "{svg}");
    }

    #[test]
    fn test_closed_subpath_is_marked() {
        let svg = render_svg(&sample_doc());
        assert!(svg.contains("M3.000 2.000L4.000 3.000L3.000 4.000Z"), "{svg}");
    }

    #[test]
    fn test_open_subpath_is_not_closed() {
        let svg = render_svg(&sample_doc());
        assert!(svg.contains("M2.000 3.000L5.000 3.000\""), "{svg}");
    }

    #[test]
    fn test_empty_document_is_valid_svg() {
        let doc = emit(&[], 11, 6);
        let svg = render_svg(&doc);
        assert!(svg.contains("viewBox=\"0.00 0.00 10.00 5.00\""), "{svg}");
        assert!(!svg.contains("<path"));
        assert!(svg.ends_with("</svg>\n"));
    }
}

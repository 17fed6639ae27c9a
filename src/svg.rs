//! SVG serialization of traced shapes.
//!
//! Every attribute value is either an integer or a fixed literal, so the
//! document needs no escaping and is always well-formed. Elements are
//! concatenated without separators.

use std::fmt::Write;

use base64::{Engine as _, engine::general_purpose};

use crate::shape::{PolylineShape, RectShape, Shape};

/// Vertical distance between decorative scanlines.
pub const SCANLINE_SPACING: usize = 20;
/// Opacity of a decorative scanline.
pub const SCANLINE_OPACITY: &str = "0.05";
/// Opacity applied to polyline fills.
pub const POLYLINE_OPACITY: &str = "0.8";

/// Serialize shapes into a complete SVG document.
pub fn emit(shapes: &[Shape], width: u32, height: u32, decorate: bool) -> String {
    let mut out = String::with_capacity(128 + shapes.len() * 80);
    let _ = write!(
        out,
        r#"<svg width="{width}" height="{height}" viewBox="0 0 {width} {height}" xmlns="http://www.w3.org/2000/svg">"#
    );

    for shape in shapes {
        match shape {
            Shape::Rect(rect) => write_rect(&mut out, rect),
            Shape::Polyline(line) => write_polyline(&mut out, line),
        }
    }

    if decorate {
        write_scanlines(&mut out, width, height);
    }

    out.push_str("</svg>");
    out
}

/// Path data for a grid cell: a clockwise rectangle from its top-left corner.
pub fn rect_path_data(rect: &RectShape) -> String {
    format!(
        "M{} {} h{} v{} h-{} Z",
        rect.x, rect.y, rect.width, rect.height, rect.width
    )
}

/// Path data through every point of a polyline, closed with `Z` when requested.
///
/// Returns an empty string for a polyline without points.
pub fn polyline_path_data(line: &PolylineShape) -> String {
    let mut d = String::with_capacity(line.points.len() * 10);
    for (i, p) in line.points.iter().enumerate() {
        let cmd = if i == 0 { "M" } else { " L" };
        let _ = write!(d, "{cmd} {} {}", p.x, p.y);
    }
    if line.closed && !line.points.is_empty() {
        d.push_str(" Z");
    }
    d
}

fn write_rect(out: &mut String, rect: &RectShape) {
    let _ = write!(
        out,
        r#"<path d="{}" fill="{}" stroke="none"/>"#,
        rect_path_data(rect),
        rect.color
    );
}

fn write_polyline(out: &mut String, line: &PolylineShape) {
    if line.points.is_empty() {
        return;
    }
    let _ = write!(
        out,
        r#"<path fill="{}" opacity="{POLYLINE_OPACITY}" d="{}"/>"#,
        line.color,
        polyline_path_data(line)
    );
}

fn write_scanlines(out: &mut String, width: u32, height: u32) {
    for y in (0..height).step_by(SCANLINE_SPACING) {
        let _ = write!(
            out,
            r#"<rect y="{y}" width="{width}" height="1" fill="black" opacity="{SCANLINE_OPACITY}"/>"#
        );
    }
}

/// Encode an SVG document as a base64 `data:` URI suitable for an `<img src>`.
pub fn to_data_uri(svg: &str) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        general_purpose::STANDARD.encode(svg.as_bytes())
    )
}

const SVG_OPEN: &str = "<svg";
const SVG_CLOSE: &str = "</svg>";

/// The root element of an externally produced document, from the first
/// `<svg` through the last `</svg>`. Prologs, comments and trailing
/// whitespace around it are dropped.
pub fn svg_root(doc: &str) -> Option<&str> {
    let start = doc.find(SVG_OPEN)?;
    let close = doc.rfind(SVG_CLOSE).filter(|&at| at > start)?;
    Some(&doc[start..close + SVG_CLOSE.len()])
}

/// Append scanline decoration just before the closing tag of `root`.
///
/// `root` must end with `</svg>`, as returned by [`svg_root`].
pub fn with_scanlines(root: &str, width: u32, height: u32) -> String {
    let body = root.strip_suffix(SVG_CLOSE).unwrap_or(root);
    let lines = height as usize / SCANLINE_SPACING + 1;
    let mut out = String::with_capacity(root.len() + lines * 80);
    out.push_str(body);
    write_scanlines(&mut out, width, height);
    out.push_str(SVG_CLOSE);
    out
}

/// Number of `<path>` elements that draw something. Paths with empty
/// path data (`d=""`) are not counted.
pub fn count_drawn_paths(doc: &str) -> usize {
    doc.split("<path")
        .skip(1)
        .filter(|element| {
            let tag = element.split('>').next().unwrap_or_default();
            !tag.contains(r#" d="""#)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::shape::Point;

    fn rect(x: u32, y: u32, size: u32, color: Color) -> Shape {
        Shape::Rect(RectShape {
            x,
            y,
            width: size,
            height: size,
            color,
        })
    }

    mod emit {
        use super::*;

        #[test]
        fn empty_document() {
            let svg = emit(&[], 3, 2, false);
            assert_eq!(
                svg,
                r#"<svg width="3" height="2" viewBox="0 0 3 2" xmlns="http://www.w3.org/2000/svg"></svg>"#
            );
        }

        #[test]
        fn rect_element() {
            let svg = emit(&[rect(8, 0, 8, Color::new(224, 0, 0))], 16, 16, false);
            assert!(svg.contains(
                r#"<path d="M8 0 h8 v8 h-8 Z" fill="rgb(224,0,0)" stroke="none"/>"#
            ));
        }

        #[test]
        fn clipped_rect_uses_both_extents() {
            let shape = Shape::Rect(RectShape {
                x: 8,
                y: 8,
                width: 2,
                height: 3,
                color: Color::BLACK,
            });
            assert!(emit(&[shape], 10, 11, false).contains(r#"d="M8 8 h2 v3 h-2 Z""#));
        }

        #[test]
        fn polyline_element() {
            let line = Shape::Polyline(PolylineShape {
                color: Color::new(1, 2, 3),
                points: vec![Point::new(0, 0), Point::new(4, 0), Point::new(4, 4)],
                closed: true,
            });
            let svg = emit(&[line], 5, 5, false);
            assert!(svg.contains(
                r#"<path fill="rgb(1,2,3)" opacity="0.8" d="M 0 0 L 4 0 L 4 4 Z"/>"#
            ));
        }

        #[test]
        fn empty_polyline_skipped() {
            let line = Shape::Polyline(PolylineShape {
                color: Color::BLACK,
                points: Vec::new(),
                closed: true,
            });
            assert!(!emit(&[line], 5, 5, false).contains("<path"));
        }

        #[test]
        fn scanlines_every_twenty_pixels() {
            let svg = emit(&[], 30, 45, true);
            assert_eq!(svg.matches("<rect ").count(), 3);
            assert!(svg.contains(
                r#"<rect y="40" width="30" height="1" fill="black" opacity="0.05"/>"#
            ));
            assert!(svg.ends_with("</svg>"));
        }

        #[test]
        fn scanlines_follow_shapes() {
            let svg = emit(&[rect(0, 0, 1, Color::BLACK)], 1, 1, true);
            let path_at = svg.find("<path").unwrap();
            let rect_at = svg.find("<rect").unwrap();
            assert!(path_at < rect_at);
        }
    }

    mod polyline_path_data {
        use super::*;

        #[test]
        fn single_point() {
            let line = PolylineShape {
                color: Color::BLACK,
                points: vec![Point::new(7, 9)],
                closed: true,
            };
            assert_eq!(polyline_path_data(&line), "M 7 9 Z");
        }

        #[test]
        fn open_path_has_no_close() {
            let line = PolylineShape {
                color: Color::BLACK,
                points: vec![Point::new(0, 1), Point::new(2, 3)],
                closed: false,
            };
            assert_eq!(polyline_path_data(&line), "M 0 1 L 2 3");
        }
    }

    mod svg_root {
        use super::*;

        #[test]
        fn strips_prolog_and_trailing_newline() {
            let doc = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- Generator: visioncortex VTracer -->\n<svg version=\"1.1\"><path d=\"M0 0\"/></svg>\n";
            assert_eq!(
                svg_root(doc),
                Some("<svg version=\"1.1\"><path d=\"M0 0\"/></svg>")
            );
        }

        #[test]
        fn missing_tags_rejected() {
            assert_eq!(svg_root("<path d=\"M0 0\"/>"), None);
            assert_eq!(svg_root("<svg><path/>"), None);
            assert_eq!(svg_root("</svg><svg>"), None);
        }
    }

    #[test]
    fn scanlines_inserted_before_close() {
        let svg = with_scanlines("<svg><path d=\"M0 0\"/></svg>", 10, 25);
        assert_eq!(
            svg,
            concat!(
                r#"<svg><path d="M0 0"/>"#,
                r#"<rect y="0" width="10" height="1" fill="black" opacity="0.05"/>"#,
                r#"<rect y="20" width="10" height="1" fill="black" opacity="0.05"/>"#,
                "</svg>"
            )
        );
    }

    #[test]
    fn empty_paths_not_counted() {
        let doc = r##"<svg><path d="" fill="#000"/><path d="M0 0 L1 1 Z" fill="#000"/><path fill="red" d="M2 2 Z"/></svg>"##;
        assert_eq!(count_drawn_paths(doc), 2);
        assert_eq!(count_drawn_paths("<svg></svg>"), 0);
    }

    #[test]
    fn data_uri_prefix_and_payload() {
        let uri = to_data_uri("<svg></svg>");
        assert_eq!(uri, "data:image/svg+xml;base64,PHN2Zz48L3N2Zz4=");
    }
}

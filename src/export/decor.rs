//! Decorative page framing: a border plus four filled corner circles,
//! appended uniformly to every page after the content pass. Purely cosmetic
//! and independent of page content.

use printpdf::graphics::{LinePoint, PaintMode, Point, Polygon, PolygonRing, WindingOrder};
use printpdf::ops::Op;
use printpdf::{Mm, Pt, Rgb};

/// Border stroke width (the source uses 0.5 mm).
const BORDER_WIDTH_MM: f32 = 0.5;

/// Corner ornament radius (half of the source's 10 mm decoration size).
const ORNAMENT_RADIUS_MM: f32 = 5.0;

fn pink() -> printpdf::color::Color {
    printpdf::color::Color::Rgb(Rgb::new(
        255.0 / 255.0,
        192.0 / 255.0,
        203.0 / 255.0,
        None,
    ))
}

/// Appends the framing ops for one page. All inputs are in points; the
/// border is inset half a margin from each edge with an ornament on each of
/// its corners.
pub(super) fn apply(ops: &mut Vec<Op>, page_width: f32, page_height: f32, margin: f32) {
    let inset = margin / 2.0;

    ops.push(Op::SetOutlineThickness {
        pt: Mm(BORDER_WIDTH_MM).into_pt(),
    });
    ops.push(Op::SetOutlineColor { col: pink() });
    ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![rect_ring(
                inset,
                inset,
                page_width - margin,
                page_height - margin,
            )],
            mode: PaintMode::Stroke,
            winding_order: WindingOrder::EvenOdd,
        },
    });

    ops.push(Op::SetFillColor { col: pink() });
    let radius = Mm(ORNAMENT_RADIUS_MM).into_pt().0;
    let corners = [
        (inset, inset),
        (page_width - inset, inset),
        (inset, page_height - inset),
        (page_width - inset, page_height - inset),
    ];
    for (cx, cy) in corners {
        ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![circle_ring(cx, cy, radius)],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::EvenOdd,
            },
        });
    }
}

fn line_point(x: f32, y: f32, bezier: bool) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier,
    }
}

fn rect_ring(x: f32, y: f32, width: f32, height: f32) -> PolygonRing {
    PolygonRing {
        points: vec![
            line_point(x, y, false),
            line_point(x + width, y, false),
            line_point(x + width, y + height, false),
            line_point(x, y + height, false),
        ],
    }
}

/// A circle as four cubic Bezier arcs. Points flagged `bezier` are control
/// points for the curve into the next anchor.
fn circle_ring(cx: f32, cy: f32, r: f32) -> PolygonRing {
    // Kappa: control-point offset for a quarter-circle arc.
    const K: f32 = 0.552_284_8;
    let k = K * r;
    PolygonRing {
        points: vec![
            line_point(cx + r, cy, false),
            line_point(cx + r, cy + k, true),
            line_point(cx + k, cy + r, true),
            line_point(cx, cy + r, false),
            line_point(cx - k, cy + r, true),
            line_point(cx - r, cy + k, true),
            line_point(cx - r, cy, false),
            line_point(cx - r, cy - k, true),
            line_point(cx - k, cy - r, true),
            line_point(cx, cy - r, false),
            line_point(cx + k, cy - r, true),
            line_point(cx + r, cy - k, true),
            line_point(cx + r, cy, false),
        ],
    }
}

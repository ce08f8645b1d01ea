use std::sync::OnceLock;

use ab_glyph::{FontRef, PxScale};
use image::Rgb;
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut};
use imageproc::geometry::convex_hull;
use imageproc::point::Point;

use super::Decoded;
use crate::source::Frame;

/// Overlay color for polylines and text (green, like every barcode scanner
/// since the dawn of time).
const MARK: Rgb<u8> = Rgb([0, 255, 0]);

/// Text height in pixels for the decoded-text label.
const LABEL_SCALE: f32 = 16.0;

static FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static FONT: OnceLock<FontRef<'static>> = OnceLock::new();

fn font() -> &'static FontRef<'static> {
    // The bundled font is part of the binary; failing to parse it would be
    // a build defect, not a runtime condition
    FONT.get_or_init(|| FontRef::try_from_slice(FONT_BYTES).expect("bundled font is valid"))
}

/// Draw one decode result onto the frame: the bounding polygon as a closed
/// polyline, and the decoded text at the polygon's first vertex.
///
/// 2D symbologies can report more than four vertices; those are simplified
/// to their convex hull before drawing. Four or fewer points are drawn
/// verbatim.
pub fn draw_result(frame: &mut Frame, result: &Decoded) {
    let outline = outline_points(&result.polygon);
    draw_closed_polyline(frame, &outline);

    if let Some(&(x, y)) = result.polygon.first() {
        draw_text_mut(
            frame,
            MARK,
            x.max(0),
            y.max(0),
            PxScale::from(LABEL_SCALE),
            font(),
            &result.text,
        );
    }
}

/// The points actually drawn for a polygon: the convex hull when the
/// decoder reported more than four vertices, the polygon verbatim
/// otherwise.
pub fn outline_points(polygon: &[(i32, i32)]) -> Vec<(i32, i32)> {
    if polygon.len() <= 4 {
        return polygon.to_vec();
    }

    let points: Vec<Point<i32>> = polygon.iter().map(|&(x, y)| Point::new(x, y)).collect();
    convex_hull(points.as_slice())
        .into_iter()
        .map(|p| (p.x, p.y))
        .collect()
}

fn draw_closed_polyline(frame: &mut Frame, points: &[(i32, i32)]) {
    if points.len() < 2 {
        return;
    }

    for i in 0..points.len() {
        let (x0, y0) = points[i];
        let (x1, y1) = points[(i + 1) % points.len()];
        draw_line_segment_mut(frame, (x0 as f32, y0 as f32), (x1 as f32, y1 as f32), MARK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_points_are_drawn_verbatim() {
        let polygon = vec![(0, 0), (0, 10), (10, 10), (10, 0)];
        assert_eq!(outline_points(&polygon), polygon);
    }

    #[test]
    fn test_two_points_are_drawn_verbatim() {
        // 1D symbologies report just the scan-line endpoints
        let polygon = vec![(3, 5), (40, 5)];
        assert_eq!(outline_points(&polygon), polygon);
    }

    #[test]
    fn test_many_points_collapse_to_convex_hull() {
        // A square plus an interior point: the hull is the square
        let polygon = vec![(0, 0), (10, 0), (10, 10), (0, 10), (5, 5)];
        let mut hull = outline_points(&polygon);

        assert_eq!(hull.len(), 4);
        hull.sort();
        assert_eq!(hull, vec![(0, 0), (0, 10), (10, 0), (10, 10)]);
    }

    #[test]
    fn test_collinear_points_collapse_to_convex_hull_corners() {
        let polygon = vec![(0, 0), (5, 0), (10, 0), (10, 10), (0, 10)];
        let mut hull = outline_points(&polygon);

        hull.sort();
        assert_eq!(hull, vec![(0, 0), (0, 10), (10, 0), (10, 10)]);
    }

    #[test]
    fn test_draw_result_marks_polygon_edges() {
        let mut frame = Frame::new(20, 20);
        let result = Decoded {
            // Empty text keeps the label from painting over the polyline
            text: String::new(),
            polygon: vec![(2, 2), (2, 12), (12, 12), (12, 2)],
        };

        draw_result(&mut frame, &result);

        // Midpoints of all four edges are on the polyline
        assert_eq!(*frame.get_pixel(2, 7), MARK);
        assert_eq!(*frame.get_pixel(7, 12), MARK);
        assert_eq!(*frame.get_pixel(12, 7), MARK);
        assert_eq!(*frame.get_pixel(7, 2), MARK);
        // Interior stays untouched
        assert_eq!(*frame.get_pixel(7, 7), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_draw_result_clips_out_of_bounds_polygon() {
        let mut frame = Frame::new(10, 10);
        let result = Decoded {
            text: String::new(),
            polygon: vec![(-5, -5), (-5, 15), (15, 15), (15, -5)],
        };

        // Must not panic; everything off-frame is clipped
        draw_result(&mut frame, &result);
    }

    #[test]
    fn test_draw_result_writes_label_pixels() {
        let mut frame = Frame::new(120, 60);
        let result = Decoded {
            text: "CODE".to_string(),
            polygon: vec![(10, 10), (10, 40), (100, 40), (100, 10)],
        };

        draw_result(&mut frame, &result);

        // Some pixel near the label anchor picked up the overlay color
        let labeled = frame
            .enumerate_pixels()
            .any(|(x, y, p)| x > 10 && x < 100 && y >= 10 && y < 30 && p[1] > 0);
        assert!(labeled);
    }
}

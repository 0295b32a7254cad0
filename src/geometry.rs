//! Polygon helpers for traced region boundaries.
//!
//! Boundaries are closed polylines through pixel centres,
//! with integer `(x, y)` vertices as produced by
//! [`find_regions`][crate::segment::find_regions].
use image::{Rgb, RgbImage};
use imageproc::{drawing::draw_line_segment_mut, point::Point};
use ndarray::Array2;

/// Unsigned shoelace area of a closed polygon.
///
/// Vertices sit on pixel centres, so a filled `w × h` block
/// measures `(w - 1) × (h - 1)` and a single pixel or a line
/// measures zero.
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();
    twice.abs() as f64 / 2.
}

/// Rasterises a closed polygon into a `(rows, cols)` mask.
///
/// A pixel is set when an edge passes through it or its
/// centre is inside by the even-odd rule. Parts outside the mask
/// are clipped.
pub fn fill_polygon(points: &[Point<i32>], dim: (usize, usize)) -> Array2<bool> {
    let (rows, cols) = dim;
    let mut mask = Array2::from_elem(dim, false);
    if points.is_empty() || rows == 0 || cols == 0 {
        return mask;
    }

    let y_min = points.iter().map(|p| p.y).min().unwrap_or(0).max(0);
    let y_max = points.iter().map(|p| p.y).max().unwrap_or(0).min(rows as i32 - 1);

    let mut crossings = Vec::new();
    for y in y_min..=y_max {
        crossings.clear();
        let yf = y as f64;
        for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
            if (a.y <= y) != (b.y <= y) {
                let t = (yf - a.y as f64) / (b.y - a.y) as f64;
                crossings.push(a.x as f64 + t * (b.x - a.x) as f64);
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for span in crossings.chunks_exact(2) {
            let start = span[0].ceil().max(0.) as usize;
            let end = (span[1].ceil().min(cols as f64)).max(0.) as usize;
            for x in start..end {
                mask[(y as usize, x)] = true;
            }
        }
    }

    for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let steps = dx.abs().max(dy.abs()).max(1);
        for s in 0..=steps {
            let t = s as f64 / steps as f64;
            let x = (a.x as f64 + t * dx as f64).round() as i64;
            let y = (a.y as f64 + t * dy as f64).round() as i64;
            if x >= 0 && y >= 0 && (x as usize) < cols && (y as usize) < rows {
                mask[(y as usize, x as usize)] = true;
            }
        }
    }
    mask
}

/// Draws a closed outline `thickness` pixels wide.
pub fn draw_outline(image: &mut RgbImage, points: &[Point<i32>], color: Rgb<u8>, thickness: u32) {
    if points.is_empty() {
        return;
    }
    for off in 0..thickness.max(1) {
        let off = off as f32;
        for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
            for (dx, dy) in [(off, 0.), (0., off)] {
                draw_line_segment_mut(
                    image,
                    (a.x as f32 + dx, a.y as f32 + dy),
                    (b.x as f32 + dx, b.y as f32 + dy),
                    color,
                );
            }
        }
    }
}

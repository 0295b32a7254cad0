//! Hot-zone segmentation of a grayscale surface.
//!
//! Pixels strictly above the threshold form a binary mask.
//! The mask is cleaned with a morphological opening and its
//! borders are traced into [`Region`]s. Nesting is kept as
//! an index forest: a region with a parent is a hole inside
//! that parent (or an island inside a hole).
use image::{GrayImage, Luma};
use imageproc::{
    contours::{find_contours, BorderType},
    morphology::{grayscale_open, Mask},
    point::Point,
};
use ndarray::Array2;

/// The 5×5 elliptical structuring element, centred at (2, 2).
#[rustfmt::skip]
const ELLIPSE_5X5: [[u8; 5]; 5] = [
    [0, 0, 1, 0, 0],
    [1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1],
    [0, 0, 1, 0, 0],
];

fn ellipse_mask() -> Mask {
    let kernel = GrayImage::from_fn(5, 5, |x, y| {
        Luma([ELLIPSE_5X5[y as usize][x as usize] * 255])
    });
    Mask::from_image(&kernel, 2, 2)
}

/// A closed boundary traced on the pixel grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Boundary pixels as `(x, y)`, in tracing order.
    pub points: Vec<Point<i32>>,
    /// Index of the directly enclosing region.
    pub parent: Option<usize>,
    pub border: BorderType,
}

impl Region {
    pub fn is_outer(&self) -> bool {
        self.parent.is_none()
    }
}

/// Output of [`segment`]: the cleaned mask and its regions.
#[derive(Debug, Clone)]
pub struct Segmentation {
    pub mask: Array2<bool>,
    pub regions: Vec<Region>,
}

impl Segmentation {
    pub fn hot_pixels(&self) -> usize {
        self.mask.iter().filter(|&&hot| hot).count()
    }

    pub fn outer_regions(&self) -> impl Iterator<Item = (usize, &Region)> {
        self.regions.iter().enumerate().filter(|(_, r)| r.is_outer())
    }

    /// Regions whose parent is `idx`.
    pub fn children_of(&self, idx: usize) -> impl Iterator<Item = (usize, &Region)> {
        self.regions
            .iter()
            .enumerate()
            .filter(move |(_, r)| r.parent == Some(idx))
    }
}

/// Thresholds, opens and traces `grayscale`.
pub fn segment(grayscale: &Array2<u8>, threshold: u8) -> Segmentation {
    let mask = open(&hot_mask(grayscale, threshold));
    let regions = find_regions(&mask);
    log::debug!(
        "threshold {}: {} regions, {} outer",
        threshold,
        regions.len(),
        regions.iter().filter(|r| r.is_outer()).count()
    );
    Segmentation { mask, regions }
}

/// Pixels strictly hotter than `threshold`.
pub fn hot_mask(grayscale: &Array2<u8>, threshold: u8) -> Array2<bool> {
    grayscale.mapv(|gray| gray > threshold)
}

/// Morphological opening with the 5×5 ellipse.
///
/// Out-of-bounds neighbours are ignored, so the image border
/// never erodes a region that touches it.
pub fn open(mask: &Array2<bool>) -> Array2<bool> {
    let (rows, cols) = mask.dim();
    if rows == 0 || cols == 0 {
        return mask.clone();
    }
    let image = GrayImage::from_fn(cols as u32, rows as u32, |x, y| {
        Luma([if mask[(y as usize, x as usize)] { 255 } else { 0 }])
    });
    let opened = grayscale_open(&image, &ellipse_mask());
    Array2::from_shape_fn((rows, cols), |(r, c)| {
        opened.get_pixel(c as u32, r as u32)[0] != 0
    })
}

/// Traces every border of `mask` with its nesting.
///
/// The mask is traced inside a one pixel background frame so
/// that regions touching the image edges are closed.
pub fn find_regions(mask: &Array2<bool>) -> Vec<Region> {
    let (rows, cols) = mask.dim();
    if rows == 0 || cols == 0 {
        return vec![];
    }
    let framed = GrayImage::from_fn(cols as u32 + 2, rows as u32 + 2, |x, y| {
        let inside = x >= 1 && y >= 1 && (x as usize) <= cols && (y as usize) <= rows;
        Luma([if inside && mask[(y as usize - 1, x as usize - 1)] {
            255
        } else {
            0
        }])
    });

    find_contours::<i32>(&framed)
        .into_iter()
        .map(|c| Region {
            points: c
                .points
                .into_iter()
                .map(|p| Point::new(p.x - 1, p.y - 1))
                .collect(),
            parent: c.parent,
            border: c.border_type,
        })
        .collect()
}

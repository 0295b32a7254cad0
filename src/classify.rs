//! Nearest palette colour lookup.
//!
//! Every pixel is assigned the intensity of the dense palette
//! entry closest to it in RGB space. Ties go to the entry
//! met first in ascending intensity order. Squared distances
//! are compared, which orders candidates exactly like the
//! Euclidean distance does.
use std::collections::HashMap;

use image::RgbImage;
use rayon::prelude::*;

use crate::palette::{DensePalette, Rgb};

/// Brute-force nearest neighbour over the dense palette.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    palette: &'a DensePalette,
}

impl<'a> Classifier<'a> {
    pub fn new(palette: &'a DensePalette) -> Self {
        Classifier { palette }
    }

    pub fn palette(&self) -> &'a DensePalette {
        self.palette
    }

    /// Intensity of the palette entry nearest to `color`.
    pub fn classify(&self, color: Rgb) -> u8 {
        let mut best = 255;
        let mut best_dist = u32::MAX;
        for entry in self.palette.entries() {
            let dist = distance_sq(color, entry.color);
            if dist < best_dist {
                best = entry.intensity;
                best_dist = dist;
                if dist == 0 {
                    break;
                }
            }
        }
        best
    }

    /// Classifies each distinct colour of `image` once.
    ///
    /// Photographs hold far fewer distinct colours than
    /// pixels, so this is the fast path for whole images. The
    /// result agrees with [`classify`][Self::classify] for
    /// every pixel.
    pub fn lookup_for(&self, image: &RgbImage) -> ColorLookup {
        let mut distinct: HashMap<Rgb, u8> = HashMap::new();
        for px in image.pixels() {
            distinct.entry(px.0).or_insert(0);
        }

        let table = distinct
            .into_par_iter()
            .map(|(color, _)| (color, self.classify(color)))
            .collect();
        ColorLookup { table }
    }
}

/// Memoised classification of a fixed set of colours.
#[derive(Debug, Clone, Default)]
pub struct ColorLookup {
    table: HashMap<Rgb, u8>,
}

impl ColorLookup {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn get(&self, color: Rgb) -> Option<u8> {
        self.table.get(&color).copied()
    }
}

#[inline]
fn distance_sq(a: Rgb, b: Rgb) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as i32 - y as i32;
            (d * d) as u32
        })
        .sum()
}

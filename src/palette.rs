//! Colour to intensity lookup tables.
//!
//! A false-colour thermal photograph encodes intensity
//! through a camera palette. A [`Palette`] holds the sparse
//! hand-specified anchors of that palette; interpolating it
//! yields a [`DensePalette`] with one colour per intensity
//! level, which is what pixels are [classified][crate::classify]
//! against.
use std::convert::TryFrom;

use image::RgbImage;
use serde_derive::*;

use crate::error::{Error, Result};

/// An 8-bit RGB triple.
pub type Rgb = [u8; 3];

/// A colour and the grayscale intensity it stands for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub color: Rgb,
    pub intensity: u8,
}

impl Anchor {
    pub const fn new(color: Rgb, intensity: u8) -> Self {
        Anchor { color, intensity }
    }
}

/// Sparse seed palette: at least two anchors with distinct
/// intensities, kept sorted by intensity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "Vec<Anchor>", into = "Vec<Anchor>")]
pub struct Palette {
    anchors: Vec<Anchor>,
}

impl Palette {
    /// Validates and sorts the anchors.
    pub fn new<I: IntoIterator<Item = Anchor>>(anchors: I) -> Result<Self> {
        let mut anchors: Vec<_> = anchors.into_iter().collect();
        if anchors.len() < 2 {
            return Err(Error::TooFewAnchors(anchors.len()));
        }

        anchors.sort_by_key(|a| a.intensity);
        if let Some(w) = anchors.windows(2).find(|w| w[0].intensity == w[1].intensity) {
            return Err(Error::DuplicateIntensity {
                first: w[0].color,
                second: w[1].color,
                intensity: w[0].intensity,
            });
        }

        Ok(Palette { anchors })
    }

    /// The six-colour rainbow palette used by the boiler
    /// survey camera: black, blue, green, yellow, red, white.
    pub fn reference() -> Self {
        Palette {
            anchors: vec![
                Anchor::new([0, 0, 0], 0),
                Anchor::new([0, 0, 255], 51),
                Anchor::new([0, 255, 0], 102),
                Anchor::new([255, 255, 0], 153),
                Anchor::new([255, 0, 0], 204),
                Anchor::new([255, 255, 255], 255),
            ],
        }
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Fills every intensity between consecutive anchors with
    /// a per-channel linear blend, truncated towards zero.
    pub fn interpolate(&self) -> DensePalette {
        let mut entries = Vec::with_capacity(256);
        for pair in self.anchors.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            entries.push(lo);

            let span = (hi.intensity - lo.intensity) as f64;
            for j in lo.intensity + 1..hi.intensity {
                let ratio = (j - lo.intensity) as f64 / span;
                entries.push(Anchor::new(blend(lo.color, hi.color, ratio), j));
            }
        }
        // `windows(2)` never yields the last anchor as a lower bound.
        entries.extend(self.anchors.last().copied());

        DensePalette { entries }
    }
}

impl TryFrom<Vec<Anchor>> for Palette {
    type Error = Error;

    fn try_from(anchors: Vec<Anchor>) -> Result<Self> {
        Palette::new(anchors)
    }
}

impl From<Palette> for Vec<Anchor> {
    fn from(palette: Palette) -> Self {
        palette.anchors
    }
}

fn blend(from: Rgb, to: Rgb, ratio: f64) -> Rgb {
    let mut out = [0; 3];
    for (o, (&c1, &c2)) in out.iter_mut().zip(from.iter().zip(to.iter())) {
        let (c1, c2) = (c1 as f64, c2 as f64);
        *o = (c1 + (c2 - c1) * ratio) as u8;
    }
    out
}

/// Interpolated palette: one entry per intensity from the
/// lowest to the highest anchor, in ascending intensity.
///
/// Built once per run and shared read-only by every
/// classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensePalette {
    entries: Vec<Anchor>,
}

impl DensePalette {
    pub fn entries(&self) -> &[Anchor] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Colour assigned to `intensity`, if it lies inside the
    /// anchor range.
    pub fn color_of(&self, intensity: u8) -> Option<Rgb> {
        let first = self.entries.first()?.intensity;
        let idx = intensity.checked_sub(first)? as usize;
        self.entries.get(idx).map(|e| e.color)
    }

    /// Draws the entries as equal-width vertical stripes,
    /// lowest intensity on the left.
    pub fn preview(&self, width: u32, height: u32) -> RgbImage {
        let n = self.entries.len().max(1) as u64;
        RgbImage::from_fn(width, height, |x, _| {
            let idx = (x as u64 * n / width as u64) as usize;
            image::Rgb(self.entries[idx.min(self.entries.len() - 1)].color)
        })
    }
}

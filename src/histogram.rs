//! Temperature histogram of a photograph.
//!
//! Binning follows the usual convention: bins are half-open
//! `[lo, hi)` except the last which also holds `max`; samples
//! outside the range (and NaNs) are dropped.
use image::RgbImage;
use ndarray::Array2;
use plotters::prelude::*;
use serde_derive::*;

use crate::error::{Error, Result};

pub const DEFAULT_BINS: usize = 50;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Counts `values` into `bins` equal-width bins over
    /// `[min, max]`. An empty range is widened by half a
    /// degree on each side.
    pub fn from_values<'a, I>(values: I, min: f64, max: f64, bins: usize) -> Self
    where
        I: IntoIterator<Item = &'a f64>,
    {
        let (min, max) = if max > min {
            (min, max)
        } else {
            (min - 0.5, max + 0.5)
        };
        let bins = bins.max(1);
        let width = (max - min) / bins as f64;

        let mut counts = vec![0; bins];
        for &v in values {
            if !(v >= min && v <= max) {
                continue;
            }
            let idx = (((v - min) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }
        Histogram { min, max, counts }
    }

    pub fn from_surface(temperature: &Array2<f64>, min: f64, max: f64, bins: usize) -> Self {
        Self::from_values(temperature.iter(), min, max, bins)
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn bin_edges(&self, idx: usize) -> (f64, f64) {
        let width = (self.max - self.min) / self.bins() as f64;
        (
            self.min + width * idx as f64,
            self.min + width * (idx + 1) as f64,
        )
    }

    /// Draws the bars on a white `width × height` raster.
    pub fn render(&self, width: u32, height: u32) -> Result<RgbImage> {
        let mut buf = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;

            let peak = self.counts.iter().copied().max().unwrap_or(0).max(1) as f64;
            let mut chart = ChartBuilder::on(&root)
                .margin(20)
                .build_cartesian_2d(self.min..self.max, 0f64..peak * 1.05)
                .map_err(render_err)?;

            chart
                .draw_series(self.counts.iter().enumerate().map(|(idx, &count)| {
                    let (lo, hi) = self.bin_edges(idx);
                    Rectangle::new([(lo, 0.), (hi, count as f64)], BLUE.mix(0.7).filled())
                }))
                .map_err(render_err)?;
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(self.min, peak * 1.05), (self.min, 0.), (self.max, 0.)],
                    BLACK.stroke_width(1),
                )))
                .map_err(render_err)?;

            root.present().map_err(render_err)?;
        }

        RgbImage::from_raw(width, height, buf)
            .ok_or_else(|| Error::Render("pixel buffer size mismatch".into()))
    }
}

fn render_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Render(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bins_are_half_open() {
        let values = [0., 1., 1.999, 2., 9.999, 10., 10.5, -0.1];
        let h = Histogram::from_values(values.iter(), 0., 10., 5);
        assert_eq!(h.counts, vec![3, 1, 0, 0, 2]);
        assert_eq!(h.total(), 6);
        assert_eq!(h.bin_edges(1), (2., 4.));
    }

    #[test]
    fn surface_counts_every_sample() {
        let temp = Array2::from_shape_fn((20, 30), |(r, c)| (r * 30 + c) as f64 / 599. * 100.);
        let h = Histogram::from_surface(&temp, 0., 100., DEFAULT_BINS);
        assert_eq!(h.bins(), 50);
        assert_eq!(h.total(), 600);
        assert!(h.counts.iter().all(|&c| c == 12 || c == 11 || c == 13));
    }

    #[test]
    fn empty_surface() {
        let temp = Array2::<f64>::zeros((0, 0));
        let h = Histogram::from_surface(&temp, 0., 100., DEFAULT_BINS);
        assert_eq!(h.total(), 0);
        assert_eq!(h.bins(), 50);
    }

    #[test]
    fn degenerate_range_is_widened() {
        let h = Histogram::from_values([5., 5., 5.].iter(), 5., 5., 10);
        assert_eq!((h.min, h.max), (4.5, 5.5));
        assert_eq!(h.total(), 3);
    }

    #[test]
    fn render_draws_bars() {
        let h = Histogram {
            min: 0.,
            max: 10.,
            counts: vec![0, 10, 0, 0],
        };
        let img = h.render(200, 100).unwrap();
        assert_eq!(img.dimensions(), (200, 100));
        assert_eq!(img.get_pixel(199, 0).0, [255, 255, 255]);
        assert!(img.pixels().any(|p| p.0[2] > p.0[0].saturating_add(50)));
    }
}

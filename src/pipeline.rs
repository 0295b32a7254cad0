//! End-to-end processing of one photograph.
//!
//! ```text
//! image ─ smoothing ─ grayscale ─┬─ segmentation ─ zones
//!                                └─ temperature ─┬─ zones
//!                                                └─ histogram
//! ```
use std::str::FromStr;

use image::RgbImage;
use imageproc::filter::{gaussian_blur_f32, median_filter};

use crate::{
    classify::Classifier,
    error::{Error, Result},
    heat::{mark_zone, measure_zones, HolePolicy, PhysicalParams, Zone},
    histogram::{Histogram, DEFAULT_BINS},
    image::ThermalMaps,
    palette::{DensePalette, Palette},
    segment::segment,
};

/// Noise filter applied before classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Smoothing {
    None,
    Median { radius: u32 },
    Gaussian { sigma: f32 },
}

impl Smoothing {
    pub fn apply(&self, image: &RgbImage) -> RgbImage {
        match *self {
            Smoothing::None => image.clone(),
            Smoothing::Median { radius } => median_filter(image, radius, radius),
            Smoothing::Gaussian { sigma } => gaussian_blur_f32(image, sigma),
        }
    }
}

/// Parses `none`, `median[:radius]` or `gaussian[:sigma]`.
impl FromStr for Smoothing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidParameter {
            name: "smoothing",
            reason,
        };
        let (kind, arg) = match s.split_once(':') {
            Some((kind, arg)) => (kind, Some(arg)),
            None => (s, None),
        };
        match (kind.trim().to_ascii_lowercase().as_str(), arg) {
            ("none", None) => Ok(Smoothing::None),
            ("median", None) => Ok(Smoothing::Median { radius: 4 }),
            ("median", Some(r)) => r
                .trim()
                .parse()
                .map(|radius| Smoothing::Median { radius })
                .map_err(|e| invalid(format!("median radius `{}`: {}", r, e))),
            ("gaussian", None) => Ok(Smoothing::Gaussian { sigma: 2. }),
            ("gaussian", Some(v)) => match v.trim().parse::<f32>() {
                Ok(sigma) if sigma > 0. => Ok(Smoothing::Gaussian { sigma }),
                _ => Err(invalid(format!("gaussian sigma `{}` must be positive", v))),
            },
            _ => Err(invalid(format!("unknown filter `{}`", s))),
        }
    }
}

/// Processing options, independent of the surveyed boiler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessorConfig {
    /// Intensities strictly above this are hot.
    pub threshold_hot: u8,
    pub smoothing: Smoothing,
    pub hole_policy: HolePolicy,
    pub histogram_bins: usize,
    pub histogram_size: (u32, u32),
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        ProcessorConfig {
            threshold_hot: 200,
            smoothing: Smoothing::Median { radius: 4 },
            hole_policy: HolePolicy::IncludeHoles,
            histogram_bins: DEFAULT_BINS,
            histogram_size: (640, 480),
        }
    }
}

/// A measured zone and its outlined photograph.
#[derive(Debug, Clone)]
pub struct ZoneRecord {
    pub zone: Zone,
    pub marked_image: RgbImage,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub zones: Vec<ZoneRecord>,
    pub histogram: Histogram,
    pub histogram_image: RgbImage,
}

impl Report {
    pub fn total_heat_loss(&self) -> f64 {
        self.zones.iter().map(|z| z.zone.heat_loss).sum()
    }
}

/// Holds the dense palette for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct ZoneProcessor {
    palette: DensePalette,
    config: ProcessorConfig,
}

impl ZoneProcessor {
    pub fn new(palette: &Palette, config: ProcessorConfig) -> Self {
        ZoneProcessor {
            palette: palette.interpolate(),
            config,
        }
    }

    pub fn palette(&self) -> &DensePalette {
        &self.palette
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Grayscale and temperature surfaces of `image`, after
    /// smoothing.
    pub fn maps(&self, image: &RgbImage, params: &PhysicalParams) -> ThermalMaps {
        let smoothed = self.config.smoothing.apply(image);
        let classifier = Classifier::new(&self.palette);
        ThermalMaps::from_image(&smoothed, &classifier, params.temperature_range())
    }

    /// Runs the whole pipeline. Fails before doing any work
    /// if `params` are invalid.
    pub fn process(&self, image: &RgbImage, params: &PhysicalParams) -> Result<Report> {
        params.validate()?;

        let maps = self.maps(image, params);
        let segmentation = segment(&maps.grayscale, self.config.threshold_hot);
        let zones = measure_zones(
            &segmentation,
            &maps.temperature,
            params,
            self.config.hole_policy,
        );

        let histogram = Histogram::from_surface(
            &maps.temperature,
            params.min_temp,
            params.max_temp,
            self.config.histogram_bins,
        );
        let (width, height) = self.config.histogram_size;
        let histogram_image = histogram.render(width, height)?;

        let zones = zones
            .into_iter()
            .map(|zone| ZoneRecord {
                marked_image: mark_zone(image, &segmentation, zone.region),
                zone,
            })
            .collect();

        Ok(Report {
            zones,
            histogram,
            histogram_image,
        })
    }
}

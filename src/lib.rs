//! Library to measure heat loss from false-colour thermal
//! photographs of boiler shells.
//!
//! A photograph exported by the thermal camera shows
//! temperature through a colour palette. This crate turns
//! such a photograph into a list of hot zones and their
//! heat loss:
//!
//! 1. Recover a grayscale intensity per pixel by matching
//! its colour against the interpolated camera
//! [palette], and rescale intensities into the calibrated
//! [temperature] range.
//!
//! 2. [Segment](segment) the pixels hotter than a threshold
//! into regions, keeping track of holes.
//!
//! 3. [Measure](heat) every outer region: net area in
//! square metres, mean temperature and the convective plus
//! radiative heat loss.
//!
//! # Usage
//!
//! The whole pipeline is run by a [`ZoneProcessor`], which
//! interpolates the palette once and can be reused across
//! photographs.
//!
//! ```rust
//! # fn test_compile() -> anyhow::Result<()> {
//! use thermal_zones::{Palette, PhysicalParams, ProcessorConfig, ZoneProcessor};
//!
//! let params: PhysicalParams = serde_json::from_str(r#"{
//!     "min_temperature": 20.0, "max_temperature": 300.0,
//!     "boiler_width_px": 820, "boiler_width_m": 1.35,
//!     "fuel_flow": 330, "heat_transfer_coeff": 15,
//!     "ambient_temp": 306
//! }"#)?;
//! let processor = ZoneProcessor::new(&Palette::reference(), ProcessorConfig::default());
//!
//! let photo = ::image::open("boiler.jpg")?.to_rgb8();
//! let report = processor.process(&photo, &params)?;
//! for record in &report.zones {
//!     println!("{:.4} m² at {:.1} °C", record.zone.area_m2, record.zone.mean_temp_celsius);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The individual stages are public as well, for callers
//! that only need, say, the temperature surface of an
//! image ([`ThermalMaps`]).

pub mod classify;
pub mod error;
pub mod geometry;
pub mod heat;
pub mod histogram;
pub mod image;
pub mod palette;
pub mod pipeline;
pub mod segment;
pub mod temperature;

#[cfg(feature = "cli")]
pub mod cli;

pub use crate::error::{Error, Result};
pub use crate::heat::{HolePolicy, PhysicalParams, Zone};
pub use crate::histogram::Histogram;
pub use crate::image::ThermalMaps;
pub use crate::palette::{Anchor, DensePalette, Palette};
pub use crate::pipeline::{ProcessorConfig, Report, Smoothing, ZoneProcessor, ZoneRecord};

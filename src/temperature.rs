//! Functions to compute temperature from grayscale intensity.
//!
//! The palette encodes a linear scale: intensity 0 is the
//! coldest calibrated temperature shown by the camera and
//! 255 the hottest.

use serde_derive::*;

pub const CELSIUS_OFFSET: f64 = 273.15;

#[inline]
pub fn celsius_to_kelvin(t: f64) -> f64 {
    t + CELSIUS_OFFSET
}

#[inline]
pub fn kelvin_to_celsius(k: f64) -> f64 {
    k - CELSIUS_OFFSET
}

/// Calibrated temperature bounds of a photograph, in °C.
///
/// Not validated here: a range with `max < min` still maps,
/// just inverted. See [`PhysicalParams::validate`][crate::heat::PhysicalParams::validate].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
}

impl TemperatureRange {
    pub fn new(min: f64, max: f64) -> Self {
        TemperatureRange { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    // temp = gray / 255 * (max - min) + min
    pub fn gray_transform(&self) -> impl Fn(u8) -> f64 {
        let (min, span) = (self.min, self.span());
        move |gray| gray as f64 / 255. * span + min
    }

    pub fn gray_to_temp(&self, gray: u8) -> f64 {
        self.gray_transform()(gray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints() {
        let range = TemperatureRange::new(20., 300.);
        assert_eq!(range.gray_to_temp(0), 20.);
        assert!((range.gray_to_temp(255) - 300.).abs() < 1e-9);
        assert!((range.gray_to_temp(51) - 76.).abs() < 1e-9);
    }

    #[test]
    fn inverted_range_still_maps() {
        let range = TemperatureRange::new(100., 0.);
        assert_eq!(range.gray_to_temp(0), 100.);
        assert!(range.gray_to_temp(255).abs() < 1e-9);
    }

    #[test]
    fn kelvin_round_trip() {
        assert_eq!(celsius_to_kelvin(0.), 273.15);
        assert!((kelvin_to_celsius(celsius_to_kelvin(32.5)) - 32.5).abs() < 1e-12);
    }
}

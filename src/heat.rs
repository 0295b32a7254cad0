//! Convective and radiative heat loss of hot zones.
//!
//! For each outer region the net pixel area (outer polygon
//! minus its direct holes) is converted to square metres
//! through the known boiler width, and the mean zone
//! temperature feeds
//!
//! ```text
//! Q = A / B * (h * (T - Ta) + σ * ((T / 100)^4 - (Ta / 100)^4))
//! ```
//!
//! with `A` the area (m²), `B` the fuel flow, `h` the
//! convective coefficient, `σ` the Stefan-Boltzmann constant
//! and both temperatures in Kelvin.
use image::{Rgb, RgbImage};
use ndarray::{Array2, Zip};
use serde_derive::*;

use crate::{
    error::{Error, Result},
    geometry::{draw_outline, fill_polygon, polygon_area},
    segment::Segmentation,
    temperature::{celsius_to_kelvin, TemperatureRange},
};

pub const STEFAN_BOLTZMANN: f64 = 5.670374419e-8;

fn default_stefan_boltzmann() -> f64 {
    STEFAN_BOLTZMANN
}

/// Physical parameters of one survey, typically read from a
/// JSON file.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PhysicalParams {
    /// Temperature shown at intensity 0 (°C).
    #[serde(rename = "min_temperature")]
    pub min_temp: f64,
    /// Temperature shown at intensity 255 (°C).
    #[serde(rename = "max_temperature")]
    pub max_temp: f64,
    /// Boiler width as seen in the photograph.
    pub boiler_width_px: f64,
    pub boiler_width_m: f64,
    pub fuel_flow: f64,
    /// Convective coefficient (W/m²K).
    pub heat_transfer_coeff: f64,
    /// Ambient temperature (K).
    pub ambient_temp: f64,
    #[serde(default = "default_stefan_boltzmann")]
    pub stefan_boltzmann: f64,
}

impl PhysicalParams {
    pub fn temperature_range(&self) -> TemperatureRange {
        TemperatureRange::new(self.min_temp, self.max_temp)
    }

    pub fn px_per_meter(&self) -> f64 {
        self.boiler_width_px / self.boiler_width_m
    }

    pub fn px_to_m2(&self, area_px: f64) -> f64 {
        area_px / self.px_per_meter().powi(2)
    }

    /// Rejects parameter sets that would make the loss
    /// computation meaningless.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("min_temperature", self.min_temp),
            ("max_temperature", self.max_temp),
            ("boiler_width_px", self.boiler_width_px),
            ("boiler_width_m", self.boiler_width_m),
            ("fuel_flow", self.fuel_flow),
            ("heat_transfer_coeff", self.heat_transfer_coeff),
            ("ambient_temp", self.ambient_temp),
            ("stefan_boltzmann", self.stefan_boltzmann),
        ];
        for &(name, value) in fields.iter() {
            if !value.is_finite() {
                return Err(invalid(name, format!("{} is not finite", value)));
            }
        }

        if self.max_temp < self.min_temp {
            return Err(invalid(
                "max_temperature",
                format!("{} is below min_temperature {}", self.max_temp, self.min_temp),
            ));
        }
        let positive = [
            ("boiler_width_px", self.boiler_width_px),
            ("boiler_width_m", self.boiler_width_m),
            ("fuel_flow", self.fuel_flow),
            ("ambient_temp", self.ambient_temp),
        ];
        for &(name, value) in positive.iter() {
            if value <= 0. {
                return Err(invalid(name, format!("{} must be positive", value)));
            }
        }
        let non_negative = [
            ("heat_transfer_coeff", self.heat_transfer_coeff),
            ("stefan_boltzmann", self.stefan_boltzmann),
        ];
        for &(name, value) in non_negative.iter() {
            if value < 0. {
                return Err(invalid(name, format!("{} must not be negative", value)));
            }
        }
        Ok(())
    }

    /// Heat loss of a zone of `area_m2` at `mean_temp` (°C).
    pub fn heat_loss(&self, area_m2: f64, mean_temp: f64) -> f64 {
        let t = celsius_to_kelvin(mean_temp);
        let ta = self.ambient_temp;
        let convective = self.heat_transfer_coeff * (t - ta);
        let radiative = self.stefan_boltzmann * ((t / 100.).powi(4) - (ta / 100.).powi(4));
        area_m2 / self.fuel_flow * (convective + radiative)
    }
}

fn invalid(name: &'static str, reason: String) -> Error {
    Error::InvalidParameter { name, reason }
}

/// Which pixels count towards a zone's mean temperature.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum HolePolicy {
    /// Every pixel inside the outer boundary, holes included.
    /// Area still excludes the holes.
    IncludeHoles,
    /// Skip pixels strictly inside a direct hole, matching
    /// the area computation.
    ExcludeHoles,
}

impl Default for HolePolicy {
    fn default() -> Self {
        HolePolicy::IncludeHoles
    }
}

/// One measured hot zone.
#[derive(Debug, Clone)]
pub struct Zone {
    /// Index of the outer region in the segmentation.
    pub region: usize,
    pub area_px: f64,
    pub area_m2: f64,
    pub mean_temp_celsius: f64,
    pub heat_loss: f64,
    /// Pixels averaged for `mean_temp_celsius`.
    pub pixels: usize,
}

/// Measures every outer region of `segmentation`.
///
/// Regions with zero polygon area are skipped.
pub fn measure_zones(
    segmentation: &Segmentation,
    temperature: &Array2<f64>,
    params: &PhysicalParams,
    policy: HolePolicy,
) -> Vec<Zone> {
    let dim = temperature.dim();
    let mut zones = vec![];

    for (idx, outer) in segmentation.outer_regions() {
        let outer_area = polygon_area(&outer.points);
        if outer_area <= 0. {
            log::trace!("skipping degenerate region {}", idx);
            continue;
        }

        let mut area_px = outer_area;
        let mut inside = fill_polygon(&outer.points, dim);
        for (_, hole) in segmentation.children_of(idx) {
            area_px -= polygon_area(&hole.points);
            if policy == HolePolicy::ExcludeHoles {
                exclude_hole_interior(&mut inside, &hole.points);
            }
        }

        let (sum, pixels) = Zip::from(&inside)
            .and(temperature)
            .fold((0., 0usize), |(sum, n), &hit, &t| {
                if hit {
                    (sum + t, n + 1)
                } else {
                    (sum, n)
                }
            });
        if pixels == 0 {
            log::trace!("skipping region {} with no interior pixels", idx);
            continue;
        }

        let mean_temp_celsius = sum / pixels as f64;
        let area_m2 = params.px_to_m2(area_px);
        zones.push(Zone {
            region: idx,
            area_px,
            area_m2,
            mean_temp_celsius,
            heat_loss: params.heat_loss(area_m2, mean_temp_celsius),
            pixels,
        });
    }

    log::debug!("{} zones measured", zones.len());
    zones
}

// Hole boundary pixels belong to the zone; only what lies
// strictly inside them is dropped.
fn exclude_hole_interior(inside: &mut Array2<bool>, hole: &[imageproc::point::Point<i32>]) {
    let filled = fill_polygon(hole, inside.dim());
    let mut boundary = Array2::from_elem(inside.dim(), false);
    for p in hole {
        if let Some(b) = boundary.get_mut((p.y as usize, p.x as usize)) {
            *b = true;
        }
    }
    Zip::from(inside)
        .and(&filled)
        .and(&boundary)
        .for_each(|keep, &f, &b| {
            if f && !b {
                *keep = false;
            }
        });
}

/// Copy of `image` with the zone's outer boundary and its
/// direct holes outlined in black.
pub fn mark_zone(image: &RgbImage, segmentation: &Segmentation, region: usize) -> RgbImage {
    let mut marked = image.clone();
    let black = Rgb([0, 0, 0]);
    draw_outline(&mut marked, &segmentation.regions[region].points, black, 2);
    for (_, hole) in segmentation.children_of(region) {
        draw_outline(&mut marked, &hole.points, black, 2);
    }
    marked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{find_regions, segment, Segmentation};

    fn params() -> PhysicalParams {
        PhysicalParams {
            min_temp: 20.,
            max_temp: 275.,
            boiler_width_px: 100.,
            boiler_width_m: 1.35,
            fuel_flow: 330.,
            heat_transfer_coeff: 15.,
            ambient_temp: 306.,
            stefan_boltzmann: STEFAN_BOLTZMANN,
        }
    }

    #[test]
    fn area_conversion() {
        let area = params().px_to_m2(1000.);
        assert!((area - 0.18225).abs() < 1e-9, "{}", area);
    }

    #[test]
    fn no_loss_at_ambient() {
        let p = params();
        let ambient_c = p.ambient_temp - 273.15;
        assert!(p.heat_loss(2.5, ambient_c).abs() < 1e-9);
        assert!(p.heat_loss(2.5, ambient_c + 10.) > 0.);
        assert!(p.heat_loss(2.5, ambient_c - 10.) < 0.);
    }

    #[test]
    fn loss_formula() {
        let p = params();
        // T = 100 °C = 373.15 K
        let expected = 1. / 330.
            * (15. * (373.15 - 306.)
                + STEFAN_BOLTZMANN * (3.7315f64.powi(4) - 3.06f64.powi(4)));
        assert!((p.heat_loss(1., 100.) - expected).abs() < 1e-12);
    }

    #[test]
    fn validation() {
        assert!(params().validate().is_ok());

        let mut p = params();
        p.max_temp = 10.;
        assert!(matches!(
            p.validate(),
            Err(Error::InvalidParameter { name: "max_temperature", .. })
        ));

        let mut p = params();
        p.fuel_flow = 0.;
        assert!(matches!(
            p.validate(),
            Err(Error::InvalidParameter { name: "fuel_flow", .. })
        ));

        let mut p = params();
        p.boiler_width_m = f64::NAN;
        assert!(p.validate().is_err());
    }

    #[test]
    fn params_from_json() {
        let p: PhysicalParams = serde_json::from_str(
            r#"{
                "min_temperature": 20.0,
                "max_temperature": 275.0,
                "boiler_width_px": 100,
                "boiler_width_m": 1.35,
                "fuel_flow": 330,
                "heat_transfer_coeff": 15,
                "ambient_temp": 306
            }"#,
        )
        .unwrap();
        assert_eq!(p, params());
    }

    fn ring_surface() -> Array2<u8> {
        // 30×30 hot square at (5, 5) with a 10×10 cold hole at (15, 15)
        Array2::from_shape_fn((40, 40), |(r, c)| {
            let outer = (5..35).contains(&r) && (5..35).contains(&c);
            let hole = (15..25).contains(&r) && (15..25).contains(&c);
            if outer && !hole {
                255
            } else {
                0
            }
        })
    }

    #[test]
    fn holes_are_subtracted_from_area() {
        let gray = ring_surface();
        let seg = segment(&gray, 200);
        let temp = Array2::from_elem(gray.dim(), 100.);
        let zones = measure_zones(&seg, &temp, &params(), HolePolicy::IncludeHoles);
        assert_eq!(zones.len(), 1);

        let zone = &zones[0];
        let outer = polygon_area(&seg.regions[zone.region].points);
        let holes: f64 = seg
            .children_of(zone.region)
            .map(|(_, h)| polygon_area(&h.points))
            .sum();
        assert!(holes > 0.);
        assert_eq!(zone.area_px, outer - holes);
        // polygons run through boundary pixel centres: about
        // 29×29 outside and 11×11 around the hole
        assert!(zone.area_px > 700. && zone.area_px < 730., "{}", zone.area_px);
        assert!((zone.mean_temp_celsius - 100.).abs() < 1e-9);
    }

    #[test]
    fn ring_area_is_exact() {
        let mask = ring_surface().mapv(|g| g > 0);
        let seg = Segmentation {
            regions: find_regions(&mask),
            mask,
        };
        assert_eq!(seg.regions.len(), 2);
        let (_, hole) = seg.children_of(0).next().unwrap();
        // the hole border skips the four corner pixels of the
        // 12×12 frame around the hole
        assert_eq!(polygon_area(&hole.points), 11. * 11. - 2.);

        let temp = Array2::from_elem(seg.mask.dim(), 100.);
        let with = measure_zones(&seg, &temp, &params(), HolePolicy::IncludeHoles);
        let without = measure_zones(&seg, &temp, &params(), HolePolicy::ExcludeHoles);
        assert_eq!(with.len(), 1);
        assert_eq!(with[0].area_px, 29. * 29. - 119.);
        assert_eq!(with[0].pixels, 30 * 30);
        assert_eq!(without[0].area_px, 722.);
        assert_eq!(without[0].pixels, 30 * 30 - 10 * 10);
    }

    #[test]
    fn full_width_band_is_measured() {
        let gray = Array2::from_shape_fn((30, 30), |(r, _)| {
            if (10..20).contains(&r) {
                255
            } else {
                0
            }
        });
        let seg = segment(&gray, 200);
        let temp = Array2::from_elem(gray.dim(), 150.);
        let zones = measure_zones(&seg, &temp, &params(), HolePolicy::IncludeHoles);
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].area_px, 29. * 9.);
        assert_eq!(zones[0].pixels, 300);
        assert!(zones[0].heat_loss > 0.);
    }

    #[test]
    fn hole_policy_changes_mean() {
        let gray = ring_surface();
        let seg = segment(&gray, 200);
        let temp = gray.mapv(|g| if g > 0 { 300. } else { 0. });

        let with = measure_zones(&seg, &temp, &params(), HolePolicy::IncludeHoles);
        let without = measure_zones(&seg, &temp, &params(), HolePolicy::ExcludeHoles);
        assert_eq!(with[0].area_px, without[0].area_px);
        assert!(with[0].mean_temp_celsius < 300.);
        assert!((without[0].mean_temp_celsius - 300.).abs() < 1e-9);
        assert!(without[0].pixels < with[0].pixels);
    }

    #[test]
    fn empty_segmentation() {
        let gray = Array2::from_elem((8, 8), 0u8);
        let seg = segment(&gray, 200);
        let temp = Array2::from_elem((8, 8), 0.);
        assert!(measure_zones(&seg, &temp, &params(), HolePolicy::default()).is_empty());
    }

    #[test]
    fn marked_image_outlines_zone() {
        let gray = ring_surface();
        let seg = segment(&gray, 200);
        let image = RgbImage::from_pixel(40, 40, Rgb([255, 255, 255]));
        let (idx, outer) = seg.outer_regions().next().unwrap();
        let marked = mark_zone(&image, &seg, idx);
        let p = outer.points[0];
        assert_eq!(marked.get_pixel(p.x as u32, p.y as u32).0, [0, 0, 0]);
        assert_eq!(marked.get_pixel(0, 0).0, [255, 255, 255]);
    }
}

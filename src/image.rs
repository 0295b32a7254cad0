//! Grayscale and temperature surfaces of a photograph.
use image::RgbImage;
use ndarray::{Array2, Zip};
use rayon::prelude::*;

use crate::{classify::Classifier, temperature::TemperatureRange};

/// Per-pixel intensity and temperature of one photograph.
/// Both arrays are indexed `(row, col)` and share the
/// image's dimensions.
#[derive(Debug, Clone)]
pub struct ThermalMaps {
    pub grayscale: Array2<u8>,
    pub temperature: Array2<f64>,
}

impl ThermalMaps {
    pub fn from_image(image: &RgbImage, classifier: &Classifier, range: TemperatureRange) -> Self {
        let grayscale = grayscale_map(image, classifier);
        let temperature = temperature_map(&grayscale, range);
        ThermalMaps {
            grayscale,
            temperature,
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.grayscale.dim()
    }
}

/// Classifies every pixel of `image` against the dense
/// palette.
pub fn grayscale_map(image: &RgbImage, classifier: &Classifier) -> Array2<u8> {
    let (width, height) = image.dimensions();
    let lookup = classifier.lookup_for(image);

    let values: Vec<u8> = image
        .as_raw()
        .par_chunks_exact(3)
        .map(|px| {
            let color = [px[0], px[1], px[2]];
            lookup
                .get(color)
                .unwrap_or_else(|| classifier.classify(color))
        })
        .collect();

    Array2::from_shape_vec((height as usize, width as usize), values)
        .unwrap_or_else(|_| unreachable!("rgb buffer holds width * height pixels"))
}

/// Affine rescale of intensities into `range`.
pub fn temperature_map(grayscale: &Array2<u8>, range: TemperatureRange) -> Array2<f64> {
    let t = range.gray_transform();
    Zip::from(grayscale).par_map_collect(|&gray| t(gray))
}

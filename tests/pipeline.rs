use image::{Rgb, RgbImage};
use thermal_zones::{
    segment::segment, HolePolicy, Palette, PhysicalParams, ProcessorConfig, Smoothing,
    ZoneProcessor,
};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);
const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

fn params() -> PhysicalParams {
    serde_json::from_str(
        r#"{
            "min_temperature": 0,
            "max_temperature": 255,
            "boiler_width_px": 100,
            "boiler_width_m": 1.35,
            "fuel_flow": 330,
            "heat_transfer_coeff": 15,
            "ambient_temp": 306
        }"#,
    )
    .unwrap()
}

fn processor(hole_policy: HolePolicy) -> ZoneProcessor {
    ZoneProcessor::new(
        &Palette::reference(),
        ProcessorConfig {
            smoothing: Smoothing::None,
            hole_policy,
            ..ProcessorConfig::default()
        },
    )
}

/// Blue background, a white ring with a yellow (cooler) hole,
/// and a separate white square.
fn boiler() -> RgbImage {
    RgbImage::from_fn(120, 80, |x, y| {
        let ring = (10..50).contains(&x) && (10..50).contains(&y);
        let hole = (22..38).contains(&x) && (22..38).contains(&y);
        let square = (70..100).contains(&x) && (30..60).contains(&y);
        if ring && hole {
            YELLOW
        } else if ring || square {
            WHITE
        } else {
            BLUE
        }
    })
}

#[test]
fn zones_of_synthetic_boiler() {
    let image = boiler();
    let report = processor(HolePolicy::IncludeHoles)
        .process(&image, &params())
        .unwrap();
    assert_eq!(report.zones.len(), 2);

    let mut areas: Vec<f64> = report.zones.iter().map(|z| z.zone.area_px).collect();
    areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
    // square: about 29×29; ring: about 39×39 minus 17×17
    assert!((areas[0] - 29. * 29.).abs() < 10., "{:?}", areas);
    assert!((areas[1] - (39. * 39. - 17. * 17.)).abs() < 15., "{:?}", areas);

    for record in &report.zones {
        let zone = &record.zone;
        assert_eq!(record.marked_image.dimensions(), image.dimensions());
        assert!(zone.heat_loss > 0.);
        assert!((zone.area_m2 - params().px_to_m2(zone.area_px)).abs() < 1e-12);
    }
    assert_eq!(report.histogram.total(), 120 * 80);
    assert_eq!(report.histogram.bins(), 50);
}

#[test]
fn hole_policy_only_affects_mean() {
    let image = boiler();
    let with = processor(HolePolicy::IncludeHoles)
        .process(&image, &params())
        .unwrap();
    let without = processor(HolePolicy::ExcludeHoles)
        .process(&image, &params())
        .unwrap();

    let ring = |r: &thermal_zones::Report| {
        r.zones
            .iter()
            .map(|z| z.zone.clone())
            .max_by(|a, b| a.pixels.cmp(&b.pixels))
            .unwrap()
    };
    let (a, b) = (ring(&with), ring(&without));
    assert_eq!(a.area_px, b.area_px);
    // the hole is yellow (153), below the threshold
    assert!(a.mean_temp_celsius < 255.);
    assert!((b.mean_temp_celsius - 255.).abs() < 1e-9);
    assert!(b.heat_loss > a.heat_loss);
}

#[test]
fn threshold_monotonicity() {
    let dense = Palette::reference().interpolate();
    let image = RgbImage::from_fn(64, 48, |x, y| {
        let level = ((x * 4 + y * 2) % 256) as u8;
        Rgb(dense.color_of(level).unwrap())
    });
    let processor = processor(HolePolicy::IncludeHoles);
    let maps = processor.maps(&image, &params());

    let mut last = usize::MAX;
    for threshold in (0..=250).step_by(10) {
        let hot = segment(&maps.grayscale, threshold as u8).hot_pixels();
        assert!(hot <= last, "threshold {}: {} > {}", threshold, hot, last);
        last = hot;
    }
}

#[test]
fn custom_palette_from_json() {
    let palette: Palette = serde_json::from_str(
        r#"[
            {"color": [0, 0, 0], "intensity": 0},
            {"color": [255, 255, 255], "intensity": 255}
        ]"#,
    )
    .unwrap();
    let processor = ZoneProcessor::new(
        &palette,
        ProcessorConfig {
            smoothing: Smoothing::None,
            threshold_hot: 150,
            ..ProcessorConfig::default()
        },
    );
    let image = RgbImage::from_pixel(10, 10, Rgb([200, 200, 200]));
    let maps = processor.maps(&image, &params());
    assert!(maps.grayscale.iter().all(|&g| g == 200));

    let report = processor.process(&image, &params()).unwrap();
    assert_eq!(report.zones.len(), 1);
    assert_eq!(report.zones[0].zone.area_px, 81.);
}

#[test]
fn calibration_example() {
    let area = params().px_to_m2(1000.);
    assert!((area - 0.1823).abs() < 1e-4, "{}", area);
}

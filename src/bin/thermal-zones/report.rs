use anyhow::{Context, Result};
use serde_derive::*;
use std::{
    collections::HashMap,
    fs::{create_dir_all, File},
    io::BufWriter,
    path::{Path, PathBuf},
};
use thermal_zones::{Histogram, Report};

#[derive(Serialize, Debug)]
pub struct ZoneSummary {
    index: usize,
    image: String,
    area_m2: f64,
    mean_temp_celsius: f64,
    heat_loss: f64,
}

#[derive(Serialize, Debug)]
pub struct ImageReport {
    path: String,
    width: u32,
    height: u32,
    total_heat_loss: f64,
    zones: Vec<ZoneSummary>,
    histogram: Histogram,
}

fn stem_of(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".into())
}

/// Output directory of every input, named after its file
/// stem. Inputs sharing a stem get their position in `paths`
/// appended.
pub fn output_dirs(output: &Path, paths: &[String]) -> HashMap<String, PathBuf> {
    let mut stems: HashMap<String, usize> = HashMap::new();
    for path in paths {
        *stems.entry(stem_of(path)).or_default() += 1;
    }

    paths
        .iter()
        .enumerate()
        .map(|(index, path)| {
            let stem = stem_of(path);
            let name = if stems[&stem] > 1 {
                format!("{}-{}", stem, index)
            } else {
                stem
            };
            (path.clone(), output.join(name))
        })
        .collect()
}

/// Writes `zone{idx}.png`, `histogram.png` and
/// `report.json` under `dir`.
pub fn write_report(
    dir: &Path,
    path: &str,
    (width, height): (u32, u32),
    report: &Report,
) -> Result<ImageReport> {
    create_dir_all(dir).with_context(|| format!("could not create {}", dir.display()))?;

    let mut zones = Vec::with_capacity(report.zones.len());
    for (index, record) in report.zones.iter().enumerate() {
        let name = format!("zone{}.png", index);
        record
            .marked_image
            .save(dir.join(&name))
            .with_context(|| format!("could not write {}", name))?;
        zones.push(ZoneSummary {
            index,
            image: name,
            area_m2: record.zone.area_m2,
            mean_temp_celsius: record.zone.mean_temp_celsius,
            heat_loss: record.zone.heat_loss,
        });
    }

    report
        .histogram_image
        .save(dir.join("histogram.png"))
        .context("could not write histogram.png")?;

    let summary = ImageReport {
        path: path.to_string(),
        width,
        height,
        total_heat_loss: report.total_heat_loss(),
        zones,
        histogram: report.histogram.clone(),
    };
    let writer = BufWriter::new(File::create(dir.join("report.json"))?);
    serde_json::to_writer_pretty(writer, &summary)?;

    Ok(summary)
}

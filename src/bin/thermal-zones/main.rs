mod args;
mod report;

use std::{fs::create_dir_all, time::Instant};

use anyhow::{Context, Result};
use log::info;
use rayon::prelude::*;

use thermal_zones::{
    cli::{load_palette, load_params, load_paths_par, setup_logging},
    Palette, ProcessorConfig, ZoneProcessor,
};

use crate::{
    args::Args,
    report::{output_dirs, write_report},
};

fn main() -> Result<()> {
    let args = Args::from_cmd_line()?;
    let _logger = setup_logging(&args.log_level)?;

    let params = load_params(&args.config)?;
    let palette = match &args.palette {
        Some(path) => load_palette(path)?,
        None => Palette::reference(),
    };
    let processor = ZoneProcessor::new(
        &palette,
        ProcessorConfig {
            threshold_hot: args.threshold_hot,
            smoothing: args.smoothing,
            hole_policy: args.hole_policy,
            ..ProcessorConfig::default()
        },
    );

    create_dir_all(&args.output)
        .with_context(|| format!("could not create {}", args.output.display()))?;
    if args.dump_palette {
        processor
            .palette()
            .preview(256, 50)
            .save(args.output.join("palette.png"))
            .context("could not write palette.png")?;
    }

    let dirs = output_dirs(&args.output, &args.paths);
    let (count, zones) = load_paths_par(args.paths.clone())
        .map(|input| -> Result<usize> {
            let input = input?;
            let start = Instant::now();

            let report = processor
                .process(&input.image, &params)
                .with_context(|| format!("could not process {}", input.filename))?;
            let dir = &dirs[&input.filename];
            let summary = write_report(dir, &input.filename, input.image.dimensions(), &report)?;

            info!(
                "{}: {} zones, {:.6} total heat loss in {:.3?}",
                input.filename,
                report.zones.len(),
                report.total_heat_loss(),
                start.elapsed()
            );
            log::debug!("{:?}", summary);
            Ok(report.zones.len())
        })
        .try_fold(
            || (0usize, 0usize),
            |acc, res| -> Result<_> {
                let zones = res?;
                Ok((acc.0 + 1, acc.1 + zones))
            },
        )
        .try_reduce(|| (0, 0), |a, b| Ok((a.0 + b.0, a.1 + b.1)))?;

    eprintln!("Processed {} images, {} hot zones", count, zones);
    Ok(())
}

//! Helpers to parse CLI arguments and load inputs in the
//! accompanying binary.
//!
//! APIs here shouldn't be considered stable / used as a
//! library.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
pub use clap::{App, Arg};
use flexi_logger::{Logger, LoggerHandle};
use image::RgbImage;
use indicatif::{ProgressBar, ProgressStyle};
pub use inflector::Inflector;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::de::DeserializeOwned;

use crate::{heat::PhysicalParams, palette::Palette};

#[macro_export]
macro_rules! args_parser {
    ($name:expr) => {{
        $crate::cli::App::new($name)
            .version(clap::crate_version!())
            .author(clap::crate_authors!())
    }};
}

#[macro_export]
macro_rules! arg {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name).value_name(&$name.to_screaming_snake_case())
    }};
}

#[macro_export]
macro_rules! opt {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name)
            .long(&$name.to_kebab_case())
            .value_name(&$name.to_screaming_snake_case())
    }};
}

/// Logs to stderr at `level` unless `RUST_LOG` says
/// otherwise. Logging stops when the handle is dropped.
pub fn setup_logging(level: &str) -> Result<LoggerHandle> {
    Logger::try_with_env_or_str(level)
        .context("invalid log specification")?
        .start()
        .context("could not start logger")
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("could not open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("could not parse {}", path.display()))
}

pub fn load_params(path: &Path) -> Result<PhysicalParams> {
    let params: PhysicalParams = read_json(path)?;
    params
        .validate()
        .with_context(|| format!("invalid parameters in {}", path.display()))?;
    Ok(params)
}

pub fn load_palette(path: &Path) -> Result<Palette> {
    read_json(path)
}

pub struct ImageInput {
    pub filename: String,
    pub image: RgbImage,
}

impl ImageInput {
    fn try_from_path(filename: String) -> Result<Self> {
        let image = image::open(&filename)
            .with_context(|| format!("could not decode image {}", filename))?
            .to_rgb8();
        Ok(ImageInput { filename, image })
    }
}

pub fn load_paths_par(paths: Vec<String>) -> impl ParallelIterator<Item = Result<ImageInput>> {
    let bar = ProgressBar::new(paths.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {wide_bar:cyan/blue} {pos:>7}/{len:7}"),
    );

    paths
        .into_par_iter()
        .map(ImageInput::try_from_path)
        .inspect(move |_| bar.inc(1))
}

use anyhow::{Context, Result};
use clap::value_t_or_exit;
use std::path::PathBuf;
use thermal_zones::{arg, args_parser, opt, HolePolicy, Smoothing};

pub struct Args {
    pub paths: Vec<String>,
    pub config: PathBuf,
    pub output: PathBuf,
    pub palette: Option<PathBuf>,
    pub threshold_hot: u8,
    pub smoothing: Smoothing,
    pub hole_policy: HolePolicy,
    pub dump_palette: bool,
    pub log_level: String,
}

impl Args {
    pub fn from_cmd_line() -> Result<Args> {
        let matches = args_parser!("thermal-zones")
            .about("Measure hot zones and heat loss of boiler thermal photographs.")
            .arg(
                opt!("config")
                    .short("c")
                    .required(true)
                    .help("JSON file with the physical parameters of the survey"),
            )
            .arg(
                opt!("output")
                    .short("o")
                    .required(true)
                    .help("Directory to write zone images and reports to"),
            )
            .arg(
                opt!("palette")
                    .short("p")
                    .help("JSON palette anchors (default: six-colour rainbow)"),
            )
            .arg(
                opt!("threshold hot")
                    .short("t")
                    .help("Grayscale level above which pixels are hot.  Default is 200"),
            )
            .arg(
                opt!("smoothing")
                    .short("s")
                    .help("none, median[:radius] or gaussian[:sigma].  Default is median:4"),
            )
            .arg(
                opt!("exclude holes")
                    .takes_value(false)
                    .help("Leave hole pixels out of the zone mean temperature"),
            )
            .arg(
                opt!("dump palette")
                    .takes_value(false)
                    .help("Also write the interpolated palette as palette.png"),
            )
            .arg(
                opt!("log level")
                    .help("Log specification, e.g. debug or thermal_zones=trace.  Default is info"),
            )
            .arg(
                arg!("images")
                    .required(true)
                    .multiple(true)
                    .help("Thermal photograph paths"),
            )
            .get_matches();

        let paths = matches
            .values_of("images")
            .unwrap()
            .map(|f| f.into())
            .collect();
        let config = value_t_or_exit!(matches, "config", PathBuf);
        let output = value_t_or_exit!(matches, "output", PathBuf);
        let palette = matches.value_of("palette").map(PathBuf::from);
        let threshold_hot = matches
            .is_present("threshold hot")
            .then(|| value_t_or_exit!(matches.value_of("threshold hot"), u8))
            .unwrap_or(200);
        let smoothing = match matches.value_of("smoothing") {
            Some(s) => s.parse().context("invalid --smoothing")?,
            None => Smoothing::Median { radius: 4 },
        };
        let hole_policy = if matches.is_present("exclude holes") {
            HolePolicy::ExcludeHoles
        } else {
            HolePolicy::IncludeHoles
        };
        let dump_palette = matches.is_present("dump palette");
        let log_level = matches.value_of("log level").unwrap_or("info").to_string();

        Ok(Args {
            paths,
            config,
            output,
            palette,
            threshold_hot,
            smoothing,
            hole_policy,
            dump_palette,
            log_level,
        })
    }
}

//! Command line arguments.

use std::ffi::OsString;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::data::filter::FilterCriteria;
use crate::data::loader::LoadOptions;
use crate::data::model::{parse_date, GridCell, Region, SensorSet};

/// Parse and filter a USGS Landsat ARD bulk metadata file.
///
/// Writes the entity IDs of all scenes that pass every given filter to a text
/// file, one per line. Filters are applied in the order
/// start date, end date, cloud cover, grid, region, sensor.
///
/// Example:
///   landsat-scene-filter -f LANDSAT_ARD.csv.gz -sd 2016-07-11 -c 20 -g 3,12 -r CU
#[derive(Parser, Debug)]
#[command(name = "landsat-scene-filter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Metadata file (.csv, or .csv.gz)
    #[arg(short = 'f', long = "filename")]
    pub filename: PathBuf,

    /// Output text file
    #[arg(short = 'o', long = "output", default_value = "scene_ids.txt")]
    pub output: PathBuf,

    /// Replace an existing output file without asking
    #[arg(long)]
    pub overwrite: bool,

    /// Starting/minimum acquisition date (YYYY-MM-DD), also -sd
    #[arg(long = "start-date", value_parser = parse_date)]
    pub start_date: Option<NaiveDate>,

    /// Ending/maximum acquisition date (YYYY-MM-DD), also -ed
    #[arg(long = "end-date", value_parser = parse_date)]
    pub end_date: Option<NaiveDate>,

    /// Maximum percentage of cloud cover, e.g. "-c 80" drops scenes above 80%
    #[arg(short = 'c', long = "cloud-cover", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub cloud_cover: Option<u8>,

    /// ARD tile grid as horizontal,vertical, e.g. "-g 3,12" (most useful with -r)
    #[arg(short = 'g', long = "grid", allow_hyphen_values = true)]
    pub grid: Option<GridCell>,

    /// Region: CU (conterminous US), AK (Alaska) or HI (Hawaii)
    #[arg(short = 'r', long = "region")]
    pub region: Option<Region>,

    /// Comma separated sensors, e.g. "OLI/TIRS,ETM"; a single part like "OLI" also matches "OLI/TIRS"
    #[arg(short = 's', long = "sensor")]
    pub sensor: Option<SensorSet>,

    /// Field delimiter of the metadata file
    #[arg(short = 'd', long = "delimiter", default_value_t = ',')]
    pub delimiter: char,

    /// Show load progress
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Parse the process arguments, accepting the two-letter `-sd`/`-ed` flags.
    pub fn parse_normalized() -> Self {
        Cli::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            start_date: self.start_date,
            end_date: self.end_date,
            max_cloud_cover: self.cloud_cover,
            grid: self.grid,
            region: self.region,
            sensors: self.sensor.clone(),
        }
    }

    pub fn load_options(&self) -> anyhow::Result<LoadOptions> {
        let delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| anyhow::anyhow!("delimiter must be a single ASCII character, got '{}'", self.delimiter))?;
        Ok(LoadOptions { delimiter })
    }
}

/// Rewrite `-sd`/`-ed` (and `-sd=VALUE`) to their long forms.
///
/// clap only knows single character short flags, and `-sd` would otherwise
/// be read as `-s d`.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    const TWO_LETTER: [(&str, &str); 2] = [("-sd", "--start-date"), ("-ed", "--end-date")];

    args.into_iter()
        .map(|arg| {
            let Some(s) = arg.to_str() else {
                return arg;
            };
            for (short, long) in TWO_LETTER {
                if s == short {
                    return OsString::from(long);
                }
                if let Some(value) = s.strip_prefix(short).and_then(|rest| rest.strip_prefix('=')) {
                    return OsString::from(format!("{long}={value}"));
                }
            }
            arg
        })
        .collect()
}

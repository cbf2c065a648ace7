use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use flate2::read::GzDecoder;
use log::{debug, info};

use super::model::{SceneRecord, SceneTable};

/// Emit a progress line every this many rows.
pub const PROGRESS_INTERVAL: usize = 100_000;

/// Columns every input file must provide (by name or USGS alias).
const REQUIRED_COLUMNS: [(&str, &[&str]); 7] = [
    ("entity_id", &["entityId"]),
    ("acquisition_date", &["acquisitionDate"]),
    ("cloud_cover", &["cloudCover"]),
    ("horizontal_grid", &["horizontal", "horizontalGrid"]),
    ("vertical_grid", &["vertical", "verticalGrid"]),
    ("region", &[]),
    ("sensor", &[]),
];

/// How the input file is read.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions { delimiter: b',' }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the scene table from a metadata file.  Dispatch by extension.
///
/// * `.gz` – gzip compressed delimited text (how USGS ships bulk metadata)
/// * anything else – plain delimited text
pub fn load_scenes(path: &Path, options: &LoadOptions) -> Result<SceneTable> {
    if !path.is_file() {
        bail!("input file not found: {}", path.display());
    }

    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let file = BufReader::new(file);

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "gz" => {
            debug!("reading gzip compressed input {}", path.display());
            read_scenes(GzDecoder::new(file), options)
        }
        _ => read_scenes(file, options),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    info!("loaded {} entries from {}", table.len(), path.display());
    Ok(table)
}

// ---------------------------------------------------------------------------
// Delimited text reader
// ---------------------------------------------------------------------------

/// Header row with column names, one scene per following row.
/// Columns not needed for filtering are skipped.
pub fn read_scenes<R: Read>(source: R, options: &LoadOptions) -> Result<SceneTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers().context("reading header row")?.clone();
    debug!("input has {} columns", headers.len());
    check_required_columns(&headers)?;

    let mut scenes = Vec::new();
    for (row_no, result) in reader.deserialize::<SceneRecord>().enumerate() {
        let scene = result.with_context(|| format!("data row {}", row_no + 1))?;
        scenes.push(scene);

        if scenes.len() % PROGRESS_INTERVAL == 0 {
            info!("read {} rows...", scenes.len());
        }
    }

    Ok(SceneTable::from_records(scenes))
}

fn check_required_columns(headers: &csv::StringRecord) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|(name, aliases)| {
            !headers
                .iter()
                .any(|h| h == *name || aliases.contains(&h))
        })
        .map(|(name, _)| *name)
        .collect();

    if !missing.is_empty() {
        bail!("missing required column(s): {}", missing.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use chrono::NaiveDate;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
entity_id,acquisition_date,cloud_cover,horizontal_grid,vertical_grid,region,sensor,product
LC08_CU_003012_20160711,2016-07-11,12.5,3,12,CU,OLI/TIRS,ARD
LE07_AK_001002_20150101,2015/01/01,80,1,2,AK,ETM,ARD
LT05_HI_000000_19990505,1999-05-05,-1,0,0,HI,TM,ARD
";

    fn temp_file(suffix: &str, bytes: &[u8]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn loads_rows_in_file_order() {
        let file = temp_file(".csv", SAMPLE.as_bytes());
        let table = load_scenes(file.path(), &LoadOptions::default()).unwrap();

        assert_eq!(table.len(), 3);
        let first = &table.scenes()[0];
        assert_eq!(first.entity_id, "LC08_CU_003012_20160711");
        assert_eq!(first.acquisition_date, NaiveDate::from_ymd_opt(2016, 7, 11).unwrap());
        assert_eq!(first.cloud_cover, 12.5);
        assert_eq!((first.horizontal_grid, first.vertical_grid), (3, 12));
        assert_eq!(first.region, "CU");
        assert_eq!(first.sensor, "OLI/TIRS");

        // slash separated date
        assert_eq!(
            table.scenes()[1].acquisition_date,
            NaiveDate::from_ymd_opt(2015, 1, 1).unwrap()
        );
        assert_eq!(
            table.into_entity_ids(),
            vec![
                "LC08_CU_003012_20160711",
                "LE07_AK_001002_20150101",
                "LT05_HI_000000_19990505"
            ]
        );
    }

    #[test]
    fn accepts_usgs_header_aliases_and_padding() {
        let text = "entityId ; acquisitionDate ; cloudCover ; horizontal ; vertical ; region ; sensor\n\
                    A ; 2016-01-02 ; 5 ; 4 ; 9 ; CU ; OLI/TIRS\n";
        let table = read_scenes(text.as_bytes(), &LoadOptions { delimiter: b';' }).unwrap();

        assert_eq!(table.len(), 1);
        let scene = &table.scenes()[0];
        assert_eq!(scene.entity_id, "A");
        assert_eq!(scene.horizontal_grid, 4);
        assert_eq!(scene.vertical_grid, 9);
    }

    #[test]
    fn reads_gzip_input() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(SAMPLE.as_bytes()).unwrap();
        let file = temp_file(".csv.gz", &encoder.finish().unwrap());

        let table = load_scenes(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_scenes(Path::new("/no/such/metadata.csv"), &LoadOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("input file not found"));
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let text = "entity_id,acquisition_date,cloud_cover,horizontal_grid,region,sensor\n";
        let err = read_scenes(text.as_bytes(), &LoadOptions::default()).unwrap_err();
        assert!(format!("{err:#}").contains("vertical_grid"));
    }

    #[test]
    fn bad_cell_names_the_row() {
        let text = "entity_id,acquisition_date,cloud_cover,horizontal_grid,vertical_grid,region,sensor\n\
                    A,2016-01-02,5,4,9,CU,TM\n\
                    B,not-a-date,5,4,9,CU,TM\n";
        let err = read_scenes(text.as_bytes(), &LoadOptions::default()).unwrap_err();
        assert!(format!("{err:#}").contains("data row 2"));
    }

    #[test]
    fn header_only_file_is_an_empty_table() {
        let text = "entity_id,acquisition_date,cloud_cover,horizontal_grid,vertical_grid,region,sensor\n";
        let table = read_scenes(text.as_bytes(), &LoadOptions::default()).unwrap();
        assert!(table.is_empty());
    }
}

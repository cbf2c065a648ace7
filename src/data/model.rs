use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::error::CriteriaError;

/// Date formats found in the `acquisition_date` column. USGS bulk metadata
/// has shipped both.
const ACQUISITION_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

// ---------------------------------------------------------------------------
// SceneRecord – one row of the metadata table
// ---------------------------------------------------------------------------

/// A single Landsat scene (one row of the bulk metadata file).
///
/// Only the columns needed for filtering are decoded, everything else in the
/// source row is ignored. Each field also accepts the camelCase header used by
/// the USGS export.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SceneRecord {
    #[serde(alias = "entityId")]
    pub entity_id: String,

    #[serde(alias = "acquisitionDate", deserialize_with = "deserialize_acquisition_date")]
    pub acquisition_date: NaiveDate,

    /// Percent of the scene obscured by cloud. USGS uses negative values for
    /// "not computed".
    #[serde(alias = "cloudCover")]
    pub cloud_cover: f64,

    #[serde(alias = "horizontal", alias = "horizontalGrid")]
    pub horizontal_grid: i32,

    #[serde(alias = "vertical", alias = "verticalGrid")]
    pub vertical_grid: i32,

    /// Region code as found in the file (CU, AK, HI), not normalized.
    pub region: String,

    /// Sensor label as found in the file, e.g. `OLI/TIRS`, `ETM`, `TM`.
    pub sensor: String,
}

fn deserialize_acquisition_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_acquisition_date(&s).map_err(serde::de::Error::custom)
}

/// Parse an acquisition date in any of the formats USGS uses.
pub fn parse_acquisition_date(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    ACQUISITION_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| format!("'{s}' is not a date (expected YYYY-MM-DD or YYYY/MM/DD)"))
}

/// Parse a date given on the command line (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate, CriteriaError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|source| CriteriaError::InvalidDate {
        input: s.to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// SceneTable – the complete loaded table
// ---------------------------------------------------------------------------

/// All loaded scenes in file order.
///
/// Filtering only ever removes rows, it never changes or adds any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneTable {
    scenes: Vec<SceneRecord>,
}

impl SceneTable {
    pub fn from_records(scenes: Vec<SceneRecord>) -> Self {
        SceneTable { scenes }
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn scenes(&self) -> &[SceneRecord] {
        &self.scenes
    }

    /// Keep only the scenes for which `keep` returns true, preserving order.
    pub(crate) fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&SceneRecord) -> bool,
    {
        self.scenes.retain(keep);
    }

    /// Consume the table and return its entity ID column in row order.
    pub fn into_entity_ids(self) -> Vec<String> {
        self.scenes.into_iter().map(|s| s.entity_id).collect()
    }
}

impl FromIterator<SceneRecord> for SceneTable {
    fn from_iter<I: IntoIterator<Item = SceneRecord>>(iter: I) -> Self {
        SceneTable::from_records(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Criteria value types
// ---------------------------------------------------------------------------

/// ARD region code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Conterminous United States
    Cu,
    /// Alaska
    Ak,
    /// Hawaii
    Hi,
}

impl Region {
    pub fn code(&self) -> &'static str {
        match self {
            Region::Cu => "CU",
            Region::Ak => "AK",
            Region::Hi => "HI",
        }
    }
}

impl FromStr for Region {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "CU" => Ok(Region::Cu),
            "AK" => Ok(Region::Ak),
            "HI" => Ok(Region::Hi),
            _ => Err(CriteriaError::InvalidRegion(s.to_string())),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A tile of the ARD grid, given as `H,V` on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub horizontal: i32,
    pub vertical: i32,
}

impl GridCell {
    pub fn new(horizontal: i32, vertical: i32) -> Self {
        GridCell { horizontal, vertical }
    }

    pub fn contains(&self, scene: &SceneRecord) -> bool {
        scene.horizontal_grid == self.horizontal && scene.vertical_grid == self.vertical
    }
}

impl FromStr for GridCell {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CriteriaError::InvalidGrid(s.to_string());

        let mut parts = s.split(',');
        let (Some(h), Some(v), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let horizontal = h.trim().parse::<i32>().map_err(|_| invalid())?;
        let vertical = v.trim().parse::<i32>().map_err(|_| invalid())?;

        Ok(GridCell::new(horizontal, vertical))
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.horizontal, self.vertical)
    }
}

/// Requested sensor labels, stored upper-case.
///
/// A scene matches if its full sensor label is in the set, or if any of the
/// `/`-separated parts of that label is. `OLI`, `TIRS` and `OLI/TIRS` all
/// select an `OLI/TIRS` scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorSet {
    labels: BTreeSet<String>,
}

impl SensorSet {
    pub fn matches(&self, sensor: &str) -> bool {
        let sensor = sensor.trim().to_ascii_uppercase();
        self.labels.contains(&sensor)
            || sensor
                .split('/')
                .any(|part| self.labels.contains(part.trim()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl FromStr for SensorSet {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut labels = BTreeSet::new();
        for label in s.split(',') {
            let label = label.trim();
            if label.is_empty() {
                return Err(CriteriaError::InvalidSensorList(s.to_string()));
            }
            labels.insert(label.to_ascii_uppercase());
        }
        Ok(SensorSet { labels })
    }
}

impl fmt::Display for SensorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.labels().collect();
        f.write_str(&labels.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_parses_two_integers() {
        assert_eq!("3,12".parse::<GridCell>().unwrap(), GridCell::new(3, 12));
        assert_eq!(" 3 , 12 ".parse::<GridCell>().unwrap(), GridCell::new(3, 12));
    }

    #[test]
    fn grid_rejects_malformed_input() {
        for input in ["", "3", "3,", ",12", "3,12,1", "a,b", "3;12", "3.5,12"] {
            assert!(
                matches!(input.parse::<GridCell>(), Err(CriteriaError::InvalidGrid(_))),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn region_codes_are_exact() {
        assert_eq!("CU".parse::<Region>().unwrap(), Region::Cu);
        assert_eq!("AK".parse::<Region>().unwrap(), Region::Ak);
        assert_eq!("HI".parse::<Region>().unwrap(), Region::Hi);
        assert!("cu".parse::<Region>().is_err());
        assert!("US".parse::<Region>().is_err());
        assert_eq!(Region::Hi.to_string(), "HI");
    }

    #[test]
    fn sensor_set_matches_combined_and_single_labels() {
        let oli: SensorSet = "OLI".parse().unwrap();
        assert!(oli.matches("OLI/TIRS"));
        assert!(oli.matches("OLI"));
        assert!(!oli.matches("ETM"));

        let pair: SensorSet = "oli/tirs, tm".parse().unwrap();
        assert!(pair.matches("OLI/TIRS"));
        assert!(pair.matches("TM"));
        assert!(!pair.matches("ETM"));
        assert!(!pair.matches("OLI"));

        assert_eq!(pair.to_string(), "OLI/TIRS,TM");
    }

    #[test]
    fn sensor_set_rejects_empty_entries() {
        assert!("".parse::<SensorSet>().is_err());
        assert!("OLI,,TM".parse::<SensorSet>().is_err());
    }

    #[test]
    fn acquisition_dates_accept_both_usgs_formats() {
        let expected = NaiveDate::from_ymd_opt(2016, 7, 11).unwrap();
        assert_eq!(parse_acquisition_date("2016-07-11").unwrap(), expected);
        assert_eq!(parse_acquisition_date("2016/07/11").unwrap(), expected);
        assert!(parse_acquisition_date("11.07.2016").is_err());
    }

    #[test]
    fn cli_dates_require_iso_format() {
        assert!(parse_date("2016-07-11").is_ok());
        assert!(matches!(parse_date("2016/07/11"), Err(CriteriaError::InvalidDate { .. })));
        assert!(parse_date("2016-13-01").is_err());
    }
}

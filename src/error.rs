use chrono::NaiveDate;
use thiserror::Error;

/// Errors in the user supplied filter configuration.
///
/// These are all detected before any row is loaded or filtered.
#[derive(Debug, Error)]
pub enum CriteriaError {
    #[error("invalid grid '{0}': expected two comma-separated integers, e.g. '3,12'")]
    InvalidGrid(String),

    #[error("invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid region '{0}': expected one of CU, AK, HI")]
    InvalidRegion(String),

    #[error("invalid sensor list '{0}': expected comma-separated sensor names, e.g. 'OLI/TIRS,ETM'")]
    InvalidSensorList(String),

    #[error("end date {end} cannot be earlier than start date {start}")]
    DateOrder { start: NaiveDate, end: NaiveDate },
}

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Column layout of a seed line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedLayout {
    /// `id,name,email,phone,dob,created_at`
    WithId,
    /// `name,email,phone,dob,created_at`
    WithoutId,
}

/// One parsed seed line. The file's `created_at` column is not carried.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedRow {
    pub layout: SeedLayout,
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub dob: Option<NaiveDate>,
}

/// Why a seed line was rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeedLineError {
    #[error("expected at least 5 columns, found {0}")]
    TooFewColumns(usize),

    #[error("expected 6 columns when the first column is an id, found {0}")]
    MissingColumnForIdLayout(usize),

    #[error("line has {columns} columns but first column {value:?} is not an id")]
    NonNumericId { value: String, columns: usize },
}

const MIN_COLUMNS: usize = 5;
const ID_LAYOUT_COLUMNS: usize = 6;

/// A first line mentioning both `name` and `email` (any case) is a header
pub fn is_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("name") && lower.contains("email")
}

/// Parse one non-empty data line.
///
/// The integer parse of column 0 is the only layout discriminator: a name made
/// of digits is read as an id.
pub fn parse_line(line: &str) -> Result<SeedRow, SeedLineError> {
    let cols: Vec<&str> = line.split(',').map(str::trim).collect();

    if cols.len() < MIN_COLUMNS {
        return Err(SeedLineError::TooFewColumns(cols.len()));
    }

    match cols[0].parse::<i64>().ok() {
        Some(id) => {
            if cols.len() < ID_LAYOUT_COLUMNS {
                return Err(SeedLineError::MissingColumnForIdLayout(cols.len()));
            }
            Ok(SeedRow {
                layout: SeedLayout::WithId,
                id: Some(id),
                name: cols[1].to_string(),
                email: cols[2].to_string(),
                phone: cols[3].to_string(),
                dob: parse_dob(cols[4]),
            })
        }
        None => {
            // Six or more columns only make sense for the id layout
            if cols.len() >= ID_LAYOUT_COLUMNS {
                return Err(SeedLineError::NonNumericId {
                    value: cols[0].to_string(),
                    columns: cols.len(),
                });
            }
            Ok(SeedRow {
                layout: SeedLayout::WithoutId,
                id: None,
                name: cols[0].to_string(),
                email: cols[1].to_string(),
                phone: cols[2].to_string(),
                dob: parse_dob(cols[3]),
            })
        }
    }
}

/// ISO `YYYY-MM-DD`; empty or unparseable values are simply absent
fn parse_dob(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    raw.parse::<NaiveDate>().ok()
}

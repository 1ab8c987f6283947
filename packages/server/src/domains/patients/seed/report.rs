//! Offline inspection of a seed file (no database)

use serde::Serialize;

use super::parser::{is_header, parse_line, SeedLayout};

/// A malformed line and why it was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedLine {
    pub line_number: usize,
    pub reason: String,
}

/// What an import of this file would see before touching storage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub has_header: bool,
    pub data_rows: usize,
    pub with_id: usize,
    pub without_id: usize,
    pub malformed: Vec<RejectedLine>,
    /// Largest explicit id; the sequence would be moved past it
    pub max_explicit_id: Option<i64>,
}

/// Classify every line the same way `import_seed` does
pub fn inspect_seed<I, S>(lines: I) -> SeedReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = SeedReport::default();

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        if index == 0 && is_header(line) {
            report.has_header = true;
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        report.data_rows += 1;
        match parse_line(line) {
            Ok(row) => match row.layout {
                SeedLayout::WithId => {
                    report.with_id += 1;
                    if let Some(id) = row.id {
                        report.max_explicit_id =
                            Some(report.max_explicit_id.map_or(id, |max| max.max(id)));
                    }
                }
                SeedLayout::WithoutId => report.without_id += 1,
            },
            Err(e) => report.malformed.push(RejectedLine {
                line_number: index + 1,
                reason: e.to_string(),
            }),
        }
    }

    report
}

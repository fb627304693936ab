// Affected-links CSV report.

use std::io;
use std::path::Path;

use crate::error::CoreError;
use crate::model::LinkMetric;

/// Column names, in `LinkMetric` field order.
pub const HEADER: [&str; 7] = [
    "edge_id",
    "edge_name",
    "link_internal_id",
    "link_name",
    "isp",
    "upstream_mbps",
    "downstream_mbps",
];

/// Write `rows` as CSV. The header is written even when there are no rows.
pub fn write_csv<W: io::Write>(writer: W, rows: &[LinkMetric]) -> Result<(), CoreError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(HEADER)?;
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and write the report to it.
pub fn write_csv_file(path: &Path, rows: &[LinkMetric]) -> Result<(), CoreError> {
    let file = std::fs::File::create(path).map_err(|e| CoreError::Report {
        message: format!("{}: {e}", path.display()),
    })?;
    write_csv(io::BufWriter::new(file), rows)
}

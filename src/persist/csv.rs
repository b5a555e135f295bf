use crate::error::Result;
use crate::models::ProfileRecord;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub const CSV_HEADERS: [&str; 4] = ["name", "headline", "profile_url", "location"];

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write one comma-separated row, quoting cells that need it.
pub fn write_row<W: Write>(mut w: W, row: &[&str]) -> std::io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\r\n")
}

fn record_row(record: &ProfileRecord) -> [&str; 4] {
    [
        record.display_name(),
        record.headline.as_deref().unwrap_or(""),
        record.profile_url.as_str(),
        record.location.as_deref().unwrap_or(""),
    ]
}

pub fn write_records<W: Write>(mut w: W, records: &[ProfileRecord]) -> std::io::Result<()> {
    write_row(&mut w, &CSV_HEADERS)?;
    for record in records {
        write_row(&mut w, &record_row(record))?;
    }
    w.flush()
}

/// Rewrites the file with a header row plus one row per record.
pub fn write_csv(path: &Path, records: &[ProfileRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    write_records(BufWriter::new(file), records)?;
    Ok(())
}

use std::io::Write;

use super::BulkError;

/// Column appended to every exported row, holding "1" (approved) or "0" (rejected).
pub const PREDICTION_COLUMN: &str = "Prediction";

pub(crate) fn write_table<W: Write>(
    writer: W,
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<(), BulkError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(headers)?;
    for row in rows {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub(crate) fn table_to_string(
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<String, BulkError> {
    let mut buffer = Vec::new();
    write_table(&mut buffer, headers, rows)?;
    String::from_utf8(buffer)
        .map_err(|err| BulkError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))
}

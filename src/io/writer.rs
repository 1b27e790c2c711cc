use std::io::Write;

use crate::{
    common::{config::FieldQuoting, error::StoreError},
    domain::{
        ledger::AccountSource,
        record::{DELIMITER, RECORD_WIDTH},
    },
};

/// Writer settings for the data file. `Never` emits fields verbatim so the
/// output stays in the plain `id,name,type,balance` format.
pub fn writer_builder(quoting: FieldQuoting) -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder
        .has_headers(false)
        .delimiter(DELIMITER)
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(match quoting {
            FieldQuoting::Never => csv::QuoteStyle::Never,
            FieldQuoting::Necessary => csv::QuoteStyle::Necessary,
        });
    builder
}

/// Writes one account line. Fields are positional and not validated.
pub fn write_fields<W: Write, S: AsRef<str>>(
    wtr: &mut csv::Writer<W>,
    fields: &[S; RECORD_WIDTH],
) -> Result<(), csv::Error> {
    wtr.write_record(fields.iter().map(|f| f.as_ref().as_bytes()))
}

/// Copies every account of `source` out in index order.
///
/// Fails with [`StoreError::SourceShort`] when `source` runs out before
/// `size()` entries, so callers can bail before touching the file.
pub fn collect_fields<A: AccountSource + ?Sized>(
    source: &A,
) -> Result<Vec<[String; RECORD_WIDTH]>, StoreError> {
    let size = source.size();
    (0..size)
        .map(|index| {
            source
                .account_fields(index)
                .ok_or(StoreError::SourceShort { index, size })
        })
        .collect()
}

/// Writes already collected account lines and returns how many were written.
pub fn write_rows<W: Write>(
    writer: W,
    quoting: FieldQuoting,
    rows: &[[String; RECORD_WIDTH]],
) -> Result<usize, StoreError> {
    let mut wtr = writer_builder(quoting).from_writer(writer);
    for fields in rows {
        write_fields(&mut wtr, fields)?;
    }
    wtr.flush()?;
    Ok(rows.len())
}

/// Writes every account of `source` in index order and returns how many lines were written.
///
/// # Examples
///
/// ```
/// use account_records::common::config::FieldQuoting;
/// use account_records::domain::record::Record;
/// use account_records::io::writer::write_records;
///
/// let accounts = vec![Record::new(1001, "Alice", "Checking", 25000)];
/// let mut out = Vec::new();
/// write_records(&mut out, FieldQuoting::Never, &accounts).unwrap();
///
/// assert_eq!(String::from_utf8(out).unwrap(), "1001,Alice,Checking,25000\n");
/// ```
pub fn write_records<W: Write, A: AccountSource + ?Sized>(
    writer: W,
    quoting: FieldQuoting,
    source: &A,
) -> Result<usize, StoreError> {
    let rows = collect_fields(source)?;
    write_rows(writer, quoting, &rows)
}

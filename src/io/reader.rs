use std::{borrow::Cow, io::BufRead};

use log::warn;

use crate::{
    common::{config::FieldQuoting, error::StoreError},
    domain::record::{DELIMITER, FIELD_NAMES, RECORD_WIDTH, Record},
};

/// Field splitter for a single data line. Arity is checked by [`parse_line`]
/// rather than by the csv crate.
pub fn reader_builder(quoting: FieldQuoting) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .delimiter(DELIMITER)
        .quoting(quoting == FieldQuoting::Necessary);
    builder
}

/// Reads account lines from the data file, in file order.
///
/// Line numbers are physical and 1-based: blank lines are skipped but still
/// counted, and a trailing `\r` is dropped before the line is split. Bytes
/// that are not valid UTF-8 are replaced with U+FFFD.
///
/// # Examples
///
/// ```
/// use account_records::common::config::FieldQuoting;
/// use account_records::io::reader::read_records;
///
/// let data = "7,Bob,Savings,500\n12,Carla,Checking,1200\n";
/// let records: Vec<_> = read_records(data.as_bytes(), FieldQuoting::Never)
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].name, "Carla");
/// ```
pub fn read_records<R: BufRead>(
    input: R,
    quoting: FieldQuoting,
) -> impl Iterator<Item = Result<Record, StoreError>> {
    input
        .split(b'\n')
        .enumerate()
        .filter_map(move |(idx, res)| {
            let mut bytes = match res {
                Ok(bytes) => bytes,
                Err(err) => return Some(Err(StoreError::from(err))),
            };
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            if bytes.is_empty() {
                return None;
            }
            Some(parse_line(&bytes, idx as u64 + 1, quoting))
        })
}

/// Builds a [`Record`] from the bytes of one line, without its terminator.
pub fn parse_line(bytes: &[u8], line: u64, quoting: FieldQuoting) -> Result<Record, StoreError> {
    let raw = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = raw {
        warn!("line {line}: invalid UTF-8 replaced in {raw:?}");
    }

    let mut rdr = reader_builder(quoting).from_reader(bytes);
    let mut row = csv::ByteRecord::new();
    rdr.read_byte_record(&mut row)?;
    let fields: Vec<Cow<'_, str>> = row.iter().map(String::from_utf8_lossy).collect();

    if fields.len() != RECORD_WIDTH {
        return Err(StoreError::Arity {
            line,
            found: fields.len(),
            raw: raw.into_owned(),
        });
    }
    let id = parse_int(&fields, 0, line, &raw)?;
    let balance = parse_int(&fields, 3, line, &raw)?;
    Ok(Record::new(id, &*fields[1], &*fields[2], balance))
}

fn parse_int(fields: &[Cow<'_, str>], idx: usize, line: u64, raw: &str) -> Result<i64, StoreError> {
    fields[idx]
        .trim()
        .parse::<i64>()
        .map_err(|source| StoreError::Parse {
            line,
            field: FIELD_NAMES[idx],
            raw: raw.to_string(),
            source,
        })
}

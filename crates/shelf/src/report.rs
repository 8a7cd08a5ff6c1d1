//! The semicolon delimited report written at the end of a run.

use std::{fs::File, io, path::Path};

use log::trace;
use serde::Serialize;

use crate::{book::BookRecord, Error, ErrorKind};

/// Column names of the report, in the order fields are written.
pub const HEADER: [&str; 8] = [
    "RowNumber",
    "DataRetrievalType",
    "ISBN",
    "Title",
    "Subtitle",
    "Authors",
    "NumberOfPages",
    "PublishDate",
];

const DELIMITER: u8 = b';';

/// One line of the report, borrowing from the [`BookRecord`] it was made from.
#[derive(Serialize)]
struct Row<'a> {
    row_number: usize,
    origin: u8,
    isbn: &'a str,
    title: &'a str,
    subtitle: &'a str,
    authors: &'a str,
    number_of_pages: Option<u32>,
    publish_date: &'a str,
}

impl<'a> Row<'a> {
    fn new(row_number: usize, record: &'a BookRecord) -> Self {
        Self {
            row_number,
            origin: record.origin.code(),
            isbn: &record.isbn,
            title: &record.title,
            subtitle: &record.subtitle,
            authors: &record.authors,
            number_of_pages: record.number_of_pages,
            publish_date: &record.publish_date,
        }
    }
}

/// Writes the header and one row per record to `writer`.
///
/// Rows are numbered from 1 in the order of `records`. A missing page count is written as an
/// empty field. Fields are only quoted when they contain the delimiter, a quote or a line
/// break.
///
/// # Errors
///
/// An `Err` of kind [`ErrorKind::IO`] is returned when writing to `writer` fails.
pub fn write_report<W: io::Write>(writer: W, records: &[BookRecord]) -> Result<(), Error> {
    let mut csv = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .terminator(csv::Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(writer);

    csv.write_record(HEADER)
        .map_err(|e| Error::wrap_with(ErrorKind::IO, e, "Cannot write report header"))?;

    for (i, record) in records.iter().enumerate() {
        csv.serialize(Row::new(i + 1, record)).map_err(|e| {
            Error::wrap_with(
                ErrorKind::IO,
                e,
                format!("Cannot write report row for ISBN '{}'", record.isbn),
            )
        })?;
    }

    trace!("{} rows written to report", records.len());
    csv.flush().map_err(|e| Error::wrap(ErrorKind::IO, e))
}

/// Creates (or truncates) the file at `path` and writes the report to it.
///
/// A failure part way through leaves whatever was already written in the file.
///
/// # Errors
///
/// An `Err` of kind [`ErrorKind::IO`] is returned when the file cannot be created or written.
pub fn write_report_file<P: AsRef<Path>>(path: P, records: &[BookRecord]) -> Result<(), Error> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| {
        Error::wrap_with(
            ErrorKind::IO,
            e,
            format!("Failed to create the '{}' file for writing", path.display()),
        )
    })?;

    write_report(file, records)
}

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # shelf
//!
//! shelf looks up bibliographic data for lists of ISBNs using the Open Library books API and
//! produces a semicolon delimited report with one row per ISBN read.
//!
//! The work is split into stages which can be used on their own:
//! - [`input`] turns a text file into a list of ISBNs,
//! - [`Lookup`] resolves ISBNs through a [`Fetcher`], fetching each distinct ISBN once,
//! - [`OpenLibrary`] is the [`Fetcher`] that talks to the remote API,
//! - [`report`] writes the resulting [`BookRecord`]s.

mod api;
mod book;
mod error;
pub mod input;
mod lookup;
pub mod report;

use std::path::Path;

pub use api::{open_library::OpenLibrary, Client};
pub use book::{BookRecord, RetrievalOrigin, ERROR_TITLE};
pub use error::{Error, ErrorKind};
pub use lookup::{Fetcher, Lookup};

use log::{info, trace};

type HttpClient = reqwest::blocking::Client;

/// Reads ISBNs from `input`, looks them up using the Open Library API and writes the report to
/// `output`.
///
/// Returns the number of rows written, see [`generate_report_with`].
///
/// # Errors
///
/// An `Err` is returned when `input` cannot be read or the report cannot be written.
#[inline]
pub fn generate_report<I, O>(input: I, output: O) -> Result<usize, Error>
where
    I: AsRef<Path>,
    O: AsRef<Path>,
{
    trace!("Generate report using the Open Library API");
    generate_report_with(OpenLibrary::<HttpClient>::new(), input, output)
}

/// Reads ISBNs from `input`, looks each of them up with `fetcher` and writes the report to
/// `output`.
///
/// The report has one row per ISBN read, in input order. Each distinct ISBN is fetched once,
/// repeats are served from the cache. Returns the number of rows written.
///
/// # Errors
///
/// An `Err` is returned when `input` cannot be read, in which case nothing is fetched and
/// `output` is not touched.
/// An `Err` is returned when the report cannot be written to `output`.
pub fn generate_report_with<F, I, O>(fetcher: F, input: I, output: O) -> Result<usize, Error>
where
    F: Fetcher,
    I: AsRef<Path>,
    O: AsRef<Path>,
{
    let isbns = input::read_isbns(input)?;

    let mut lookup = Lookup::new(fetcher);
    let records = lookup.resolve(&isbns);
    info!(
        "{} ISBNs resolved with {} requests",
        records.len(),
        lookup.fetch_count()
    );

    report::write_report_file(output, &records)?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_fs::{
        fixture::{FileWriteStr, PathChild},
        TempDir,
    };

    /// Answers every ISBN with the same book except `0000000000`, which gets the placeholder a
    /// failed request produces.
    #[derive(Default)]
    struct StubFetcher {
        calls: std::rc::Rc<std::cell::Cell<usize>>,
    }

    impl Fetcher for StubFetcher {
        fn fetch(&mut self, isbn: &str) -> BookRecord {
            self.calls.set(self.calls.get() + 1);
            if isbn == "0000000000" {
                return BookRecord::unavailable(isbn);
            }
            BookRecord {
                title: "Crime and Punishment".to_owned(),
                authors: "Fyodor Dostoyevsky".to_owned(),
                number_of_pages: Some(720),
                publish_date: "2003".to_owned(),
                ..BookRecord::new(isbn)
            }
        }
    }

    #[test]
    fn duplicates_and_failures_end_up_in_report() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        let input = dir.child("ISBN_Input_File.txt");
        input
            .write_str("9780140449136, 9780140449136\n0000000000\n")
            .unwrap();
        let output = dir.child("output.csv");

        let fetcher = StubFetcher::default();
        let calls = fetcher.calls.clone();
        let rows = generate_report_with(fetcher, input.path(), output.path()).unwrap();

        assert_eq!(3, rows);
        assert_eq!(2, calls.get());
        assert_eq!(
            "RowNumber;DataRetrievalType;ISBN;Title;Subtitle;Authors;NumberOfPages;PublishDate\n\
             1;1;9780140449136;Crime and Punishment;;Fyodor Dostoyevsky;720;2003\n\
             2;2;9780140449136;Crime and Punishment;;Fyodor Dostoyevsky;720;2003\n\
             3;1;0000000000;Error retrieving data;;;;\n",
            std::fs::read_to_string(output.path()).unwrap()
        );
    }

    #[test]
    fn missing_input_fetches_nothing_and_writes_nothing() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        let output = dir.child("output.csv");

        let fetcher = StubFetcher::default();
        let calls = fetcher.calls.clone();
        let err = generate_report_with(fetcher, dir.child("missing.txt").path(), output.path())
            .unwrap_err();

        assert_eq!(ErrorKind::IO, err.kind());
        assert_eq!(0, calls.get());
        assert!(!output.path().exists());
    }
}

//! Reading ISBNs from a text file.
//!
//! The input is free form: any number of lines, each holding zero or more ISBNs separated by
//! commas. Tokens are trimmed and empty tokens are dropped, nothing else about an ISBN is
//! checked.

use std::{fs::File, io::Read, path::Path};

use log::trace;

use crate::{Error, ErrorKind};

/// Reads every ISBN from the file at `path`, in file order with duplicates kept.
///
/// # Errors
///
/// An `Err` of kind [`ErrorKind::IO`] is returned when the file cannot be opened or read.
pub fn read_isbns<P: AsRef<Path>>(path: P) -> Result<Vec<String>, Error> {
    let path = path.as_ref();
    let content = File::open(path)
        .map_err(|e| {
            Error::wrap_with(
                ErrorKind::IO,
                e,
                format!("Failed to open the '{}' file for reading", path.display()),
            )
        })
        .and_then(|mut file| read_file_to_string(&mut file))?;

    let isbns = parse_isbns(&content);
    trace!("{} ISBNs read from '{}'", isbns.len(), path.display());
    Ok(isbns)
}

fn read_file_to_string(file: &mut File) -> Result<String, Error> {
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::wrap_with(ErrorKind::IO, e, "Cannot read contents of file"))
        .map(move |bytes| {
            trace!("{bytes} bytes read from the file");
            content
        })
}

/// Splits `text` into ISBN tokens.
///
/// # Examples
/// ```
/// let isbns = shelf::input::parse_isbns("9780140449136, 0735619670\n\n,  9780140449136 ,");
/// assert_eq!(vec!["9780140449136", "0735619670", "9780140449136"], isbns);
/// ```
#[must_use]
pub fn parse_isbns(text: &str) -> Vec<String> {
    // files saved by some Windows editors start with a byte order mark
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    text.lines()
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

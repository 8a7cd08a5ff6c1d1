//! The record type produced for every looked up ISBN.

/// Title given to a record when the remote API could not provide data for an ISBN.
pub const ERROR_TITLE: &str = "Error retrieving data";

/// Where the data of a [`BookRecord`] came from during the current run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RetrievalOrigin {
    /// Fetched from the remote API during this run.
    Server,
    /// Served from the in-memory cache.
    Cache,
}

impl RetrievalOrigin {
    /// The numeric code written to the report.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Server => 1,
            Self::Cache => 2,
        }
    }
}

/// Bibliographic data for a single ISBN.
///
/// Text fields are empty when the source data did not include them, `number_of_pages` is
/// [`None`] when it was missing or could not be read as a number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookRecord {
    /// Whether this record came from the server or the cache.
    pub origin: RetrievalOrigin,
    /// The ISBN exactly as it was read from the input.
    pub isbn: String,
    /// Title of the book.
    pub title: String,
    /// Subtitle of the book.
    pub subtitle: String,
    /// Author names joined with `", "`.
    pub authors: String,
    /// Page count, if the source provided a usable one.
    pub number_of_pages: Option<u32>,
    /// Publish date as free text, e.g. `"1993"` or `"March 2003"`.
    pub publish_date: String,
}

impl BookRecord {
    /// An empty record for `isbn`, every other field is empty.
    #[must_use]
    pub fn new<S: Into<String>>(isbn: S) -> Self {
        Self {
            origin: RetrievalOrigin::Server,
            isbn: isbn.into(),
            title: String::new(),
            subtitle: String::new(),
            authors: String::new(),
            number_of_pages: None,
            publish_date: String::new(),
        }
    }

    /// The placeholder record used when no data could be retrieved for `isbn`.
    #[must_use]
    pub fn unavailable<S: Into<String>>(isbn: S) -> Self {
        Self {
            title: ERROR_TITLE.to_owned(),
            ..Self::new(isbn)
        }
    }

    /// Returns the record with its origin replaced.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // can't be const
    pub fn with_origin(self, origin: RetrievalOrigin) -> Self {
        Self { origin, ..self }
    }
}

#[test]
fn origin_codes_match_report_values() {
    assert_eq!(1, RetrievalOrigin::Server.code());
    assert_eq!(2, RetrievalOrigin::Cache.code());
}

#[test]
fn unavailable_record_only_sets_isbn_and_title() {
    let record = BookRecord::unavailable("0000000000");

    assert_eq!("0000000000", record.isbn);
    assert_eq!(ERROR_TITLE, record.title);
    assert!(record.subtitle.is_empty());
    assert!(record.authors.is_empty());
    assert_eq!(None, record.number_of_pages);
    assert!(record.publish_date.is_empty());
}

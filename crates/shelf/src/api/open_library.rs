use log::{debug, info, trace, warn};
use serde_json::{Map, Value};

use crate::{book::BookRecord, lookup::Fetcher, Error, ErrorKind};

use super::Client;

const OPEN_LIBRARY_URL: &str = "https://openlibrary.org/api/books";

/// [`Fetcher`] backed by the Open Library books API.
///
/// Every call to [`Fetcher::fetch`] sends exactly one request. A failed request or an
/// unreadable response never stops the caller, it is logged and turned into
/// [`BookRecord::unavailable`].
pub struct OpenLibrary<C: Client = reqwest::blocking::Client> {
    client: C,
}

impl<C: Client> Default for OpenLibrary<C> {
    fn default() -> Self {
        Self {
            client: C::default(),
        }
    }
}

impl<C: Client> OpenLibrary<C> {
    /// Creates a fetcher using the default value of the client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Client> Fetcher for OpenLibrary<C> {
    fn fetch(&mut self, isbn: &str) -> BookRecord {
        get_book_record(&self.client, isbn).unwrap_or_else(|err| {
            warn!("No data retrieved for ISBN '{isbn}': {err}");
            BookRecord::unavailable(isbn)
        })
    }
}

/// The key used by the API for an ISBN, both in the request and in the response.
fn bibkey(isbn: &str) -> String {
    format!("ISBN:{isbn}")
}

fn books_url(isbn: &str) -> Result<String, Error> {
    let bibkey = bibkey(isbn);
    reqwest::Url::parse_with_params(
        OPEN_LIBRARY_URL,
        &[
            ("bibkeys", bibkey.as_str()),
            ("format", "json"),
            ("jscmd", "data"),
        ],
    )
    .map(String::from)
    .map_err(|e| Error::wrap_with(ErrorKind::IO, e, "Cannot build the Open Library url"))
}

pub(crate) fn get_book_record<C: Client>(client: &C, isbn: &str) -> Result<BookRecord, Error> {
    info!("Searching for ISBN '{isbn}' using Open Library API");
    let url = books_url(isbn)?;

    // The response is keyed by bibkey with a loosely shaped object per book, so only the
    // outer map is typed.
    let body: Map<String, Value> = client.get_json(&url)?;

    trace!("Request was successful");

    match body.get(&bibkey(isbn)) {
        Some(data) => Ok(record_from_data(isbn, data)),
        None => {
            debug!("Response did not contain any data for ISBN '{isbn}'");
            Ok(BookRecord::new(isbn))
        }
    }
}

fn record_from_data(isbn: &str, data: &Value) -> BookRecord {
    BookRecord {
        title: text_field(data, "title"),
        subtitle: text_field(data, "subtitle"),
        authors: authors(data),
        number_of_pages: number_of_pages(data),
        publish_date: text_field(data, "publish_date"),
        ..BookRecord::new(isbn)
    }
}

fn text_field(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

fn authors(data: &Value) -> String {
    data.get("authors")
        .and_then(Value::as_array)
        .map(|authors| {
            authors
                .iter()
                .filter_map(|author| author.get("name").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

fn number_of_pages(data: &Value) -> Option<u32> {
    match data.get("number_of_pages")? {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .or_else(|| n.as_f64().and_then(whole_page_count)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A float page count such as `720.0` is accepted when it is a whole number that fits a `u32`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp
)] // range and fraction are checked before the cast
fn whole_page_count(pages: f64) -> Option<u32> {
    let whole = pages.is_finite() && pages.trunc() == pages;
    (whole && (0.0..=f64::from(u32::MAX)).contains(&pages)).then(|| pages as u32)
}

#[cfg(test)]
mod tests {
    use super::OpenLibrary;
    use crate::{
        api::{assert_url, impl_text_producer, MockClient, NetworkErrorProducer, ServerErrorProducer},
        book::{BookRecord, ERROR_TITLE},
        lookup::Fetcher,
    };

    const OPEN_LIBRARY_JSON: &str = include_str!("../../tests/data/open_library_json.txt");

    impl_text_producer! {
        ValidJsonProducer => Ok(OPEN_LIBRARY_JSON.to_owned()),
        LooseJsonProducer => Ok(
            r#"{
                "ISBN:123": {
                    "title": 42,
                    "authors": [{"name": "Ann Author"}, {"url": "no name"}, {"name": "Bob Writer"}],
                    "number_of_pages": "310",
                    "publish_date": null
                }
            }"#.to_owned()
        ),
        NegativePagesProducer => Ok(
            r#"{"ISBN:123": {"title": "Pages", "number_of_pages": -4}}"#.to_owned()
        ),
        NotAnObjectProducer => Ok("[]".to_owned()),
        FloatPagesProducer => Ok(
            r#"{"ISBN:1": {"title": "T", "number_of_pages": 720.0}}"#.to_owned()
        ),
        FractionalPagesProducer => Ok(
            r#"{"ISBN:1": {"title": "T", "number_of_pages": 720.5}}"#.to_owned()
        ),
    }

    fn fetch<C: crate::api::Client>(isbn: &str) -> BookRecord {
        OpenLibrary::<C>::default().fetch(isbn)
    }

    #[test]
    fn url_contains_bibkey_format_and_jscmd() {
        fetch::<MockClient<ValidJsonProducer>>("9780140449136");
        assert_url!(
            "https://openlibrary.org/api/books?bibkeys=ISBN%3A9780140449136&format=json&jscmd=data"
        );
    }

    #[test]
    fn valid_json_produces_full_record() {
        let record = fetch::<MockClient<ValidJsonProducer>>("9780140449136");

        assert_eq!("9780140449136", record.isbn);
        assert_eq!("Crime and Punishment", record.title);
        assert_eq!("A Novel in Six Parts with Epilogue", record.subtitle);
        assert_eq!("Fyodor Dostoyevsky, David McDuff", record.authors);
        assert_eq!(Some(720), record.number_of_pages);
        assert_eq!("2003", record.publish_date);
    }

    #[test]
    fn missing_key_produces_empty_record() {
        // the fixture only holds data for 9780140449136
        let record = fetch::<MockClient<ValidJsonProducer>>("0735619670");

        assert_eq!(BookRecord::new("0735619670"), record);
    }

    #[test]
    fn empty_response_produces_empty_record() {
        let record = fetch::<MockClient>("0735619670");

        assert_eq!(BookRecord::new("0735619670"), record);
    }

    #[test]
    fn server_error_produces_placeholder_record() {
        let record = fetch::<MockClient<ServerErrorProducer>>("0000000000");

        assert_eq!("0000000000", record.isbn);
        assert_eq!(ERROR_TITLE, record.title);
        assert_eq!(BookRecord::unavailable("0000000000"), record);
    }

    #[test]
    fn network_error_produces_placeholder_record() {
        let record = fetch::<MockClient<NetworkErrorProducer>>("0000000000");

        assert_eq!(BookRecord::unavailable("0000000000"), record);
    }

    #[test]
    fn body_that_is_not_an_object_produces_placeholder_record() {
        let record = fetch::<MockClient<NotAnObjectProducer>>("123");

        assert_eq!(BookRecord::unavailable("123"), record);
    }

    #[test]
    fn wrongly_typed_fields_are_treated_as_missing() {
        let record = fetch::<MockClient<LooseJsonProducer>>("123");

        assert_eq!("", record.title);
        assert_eq!("", record.subtitle);
        assert_eq!("Ann Author, Bob Writer", record.authors);
        assert_eq!(Some(310), record.number_of_pages);
        assert_eq!("", record.publish_date);
    }

    #[test]
    fn whole_float_page_count_is_a_page_count() {
        let record = fetch::<MockClient<FloatPagesProducer>>("1");

        assert_eq!("T", record.title);
        assert_eq!(Some(720), record.number_of_pages);
    }

    #[test]
    fn fractional_page_count_is_not_a_page_count() {
        let record = fetch::<MockClient<FractionalPagesProducer>>("1");

        assert_eq!(None, record.number_of_pages);
    }

    #[test]
    fn negative_page_count_is_not_a_page_count() {
        let record = fetch::<MockClient<NegativePagesProducer>>("123");

        assert_eq!("Pages", record.title);
        assert_eq!(None, record.number_of_pages);
    }
}

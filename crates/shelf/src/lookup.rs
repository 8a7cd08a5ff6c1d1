//! Deduplicating lookup of ISBNs with an in-memory cache.

use std::collections::{HashMap, HashSet};

use log::{debug, info, trace};

use crate::book::{BookRecord, RetrievalOrigin};

/// A source of [`BookRecord`]s for single ISBNs.
///
/// Implementors must always return a record: failures are expressed as a record (see
/// [`BookRecord::unavailable`]) rather than an error so that one bad ISBN never aborts a run.
pub trait Fetcher {
    /// Retrieves the record for `isbn`.
    fn fetch(&mut self, isbn: &str) -> BookRecord;
}

/// Resolves ISBNs to [`BookRecord`]s, calling the [`Fetcher`] at most once per distinct ISBN.
///
/// The cache lives as long as the `Lookup`, records are never evicted.
pub struct Lookup<F: Fetcher> {
    fetcher: F,
    cache: HashMap<String, BookRecord>,
    fetches: usize,
}

impl<F: Fetcher> Lookup<F> {
    /// Creates a lookup with an empty cache.
    #[must_use]
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            cache: HashMap::new(),
            fetches: 0,
        }
    }

    /// Resolves every ISBN in `isbns`, returning one record per input ISBN in input order.
    ///
    /// Distinct ISBNs are resolved once each in order of first occurrence: a cached ISBN is
    /// marked [`RetrievalOrigin::Cache`], anything else is fetched, marked
    /// [`RetrievalOrigin::Server`] and cached. Repeats of an ISBN within `isbns` are copies of
    /// the cached record marked [`RetrievalOrigin::Cache`].
    pub fn resolve(&mut self, isbns: &[String]) -> Vec<BookRecord> {
        let mut resolved = HashMap::new();
        for isbn in distinct(isbns) {
            let record = self.resolve_one(isbn);
            resolved.insert(isbn, record);
        }

        isbns
            .iter()
            .map(|isbn| {
                // first occurrence takes the resolved record, every later one is a cache hit
                resolved.remove(isbn.as_str()).unwrap_or_else(|| {
                    trace!("Repeated ISBN '{isbn}' served from cache");
                    self.cached_record(isbn)
                })
            })
            .collect()
    }

    /// Number of times the [`Fetcher`] has been called.
    #[must_use]
    pub const fn fetch_count(&self) -> usize {
        self.fetches
    }

    /// Number of distinct ISBNs held in the cache.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn resolve_one(&mut self, isbn: &str) -> BookRecord {
        if let Some(record) = self.cache.get(isbn) {
            debug!("ISBN '{isbn}' found in cache");
            return record.clone().with_origin(RetrievalOrigin::Cache);
        }

        info!("Fetching ISBN '{isbn}'");
        self.fetches += 1;
        let record = self
            .fetcher
            .fetch(isbn)
            .with_origin(RetrievalOrigin::Server);
        self.cache.insert(isbn.to_owned(), record.clone());
        record
    }

    fn cached_record(&self, isbn: &str) -> BookRecord {
        // every distinct ISBN was cached by `resolve_one` before the output is built
        self.cache.get(isbn).cloned().map_or_else(
            || BookRecord::new(isbn),
            |record| record.with_origin(RetrievalOrigin::Cache),
        )
    }
}

/// Distinct values of `isbns` in order of first occurrence.
fn distinct(isbns: &[String]) -> impl Iterator<Item = &str> {
    let mut seen = HashSet::new();
    isbns
        .iter()
        .map(String::as_str)
        .filter(move |isbn| seen.insert(*isbn))
}

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

pub(crate) mod open_library;

use crate::{Error, ErrorKind};

/// A blocking HTTP client able to GET a JSON document.
///
/// Anything other than `200 OK` is reported as [`ErrorKind::Status`] so callers can tell an
/// unhappy server apart from a transport failure ([`ErrorKind::IO`]) or a body that cannot be
/// parsed ([`ErrorKind::Deserialize`]).
pub trait Client
where
    Self: Default,
{
    /// Sends a GET request to `url` and deserializes the JSON body.
    ///
    /// # Errors
    ///
    /// An `Err` is returned when the request cannot be sent, the response status is not
    /// `200 OK`, or the body is not valid JSON for `T`.
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned;
}

impl Client for reqwest::blocking::Client {
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let resp = self
            .get(url)
            .send()
            .map_err(|e| Error::wrap_with(ErrorKind::IO, e, format!("GET {url} failed")))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::new(
                ErrorKind::Status(status.as_u16()),
                format!("GET {url} returned {status}"),
            ));
        }

        resp.json().map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
    }
}

#[cfg(test)]
pub(crate) use test::{
    assert_url, impl_text_producer, MockClient, NetworkErrorProducer, Producer,
    ServerErrorProducer, URL_SINK,
};

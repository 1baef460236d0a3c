use log::trace;
use serde::de::DeserializeOwned;

pub(crate) mod open_library;

use crate::{Error, ErrorKind};

/// A status line and body returned by a [`Client`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    /// Numeric HTTP status code.
    pub status: u16,
    /// Reason phrase for the status code, e.g. `Not Found`.
    ///
    /// The `reqwest` client fills this with the canonical reason for the code, not the phrase
    /// the server sent, and leaves it empty for unknown codes.
    pub status_text: String,
    /// The response body, empty for non-success responses.
    pub body: String,
}

impl Response {
    /// `true` for a 2xx status code.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// The HTTP seam used by [`OpenLibrary`](crate::OpenLibrary).
///
/// A client issues a single GET for each call and does not retry.
pub trait Client {
    /// Sends a GET request to `url`.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Io`] error is returned when the request cannot be sent or the response
    /// cannot be read. A non-success status is not an error at this level.
    fn fetch(&self, url: &str) -> Result<Response, Error>;
}

impl Client for reqwest::blocking::Client {
    fn fetch(&self, url: &str) -> Result<Response, Error> {
        let resp = self
            .get(url)
            .send()
            .map_err(|e| Error::wrap(ErrorKind::Io, e))?;

        let status = resp.status();
        let status_text = reason(status);
        trace!("Response status was {status}");

        let body = if status.is_success() {
            resp.text().map_err(|e| Error::wrap(ErrorKind::Io, e))?
        } else {
            String::new()
        };

        Ok(Response {
            status: status.as_u16(),
            status_text,
            body,
        })
    }
}

// canonical phrase only, reqwest does not expose the one on the wire
fn reason(status: reqwest::StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_owned()
}

pub(crate) fn decode<T>(resp: &Response) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    serde_json::from_str(&resp.body).map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
}

#[cfg(test)]
pub(crate) use test::{
    assert_url, impl_response_producer, ok_json, request_count, status, MockClient,
    NetworkErrorProducer, Producer, URL_SINK,
};

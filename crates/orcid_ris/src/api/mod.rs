use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;

pub(crate) mod orcid;

/// A blocking JSON fetch primitive.
///
/// Implementations send a single GET request with the given `Accept` header and deserialize the
/// response body. No retry or backoff is performed.
pub trait Client
where
    Self: Default,
{
    fn get_json<T>(&self, url: &str, accept: &str) -> Result<T, Error>
    where
        T: DeserializeOwned;
}

impl Client for reqwest::blocking::Client {
    fn get_json<T>(&self, url: &str, accept: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        self.get(url)
            .header(ACCEPT, accept)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| Error::wrap_with(ErrorKind::IO, e, format!("Request to '{url}' failed")))
            .and_then(|r| r.json().map_err(|e| Error::wrap(ErrorKind::Deserialize, e)))
    }
}

#[cfg(test)]
pub(crate) use test::{
    assert_url, impl_text_producer, requested_urls, MockClient, NetworkErrorProducer, Producer,
    URL_SINK,
};

use crate::{Error, ErrorKind};

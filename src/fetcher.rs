use std::{future::Future, time::Duration};

use thiserror::Error;
use url::Url;

/// Hard per-request bound; a page slower than this counts as a failed fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(3);

const USER_AGENT: &str = concat!("scurry/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("request failed with status {0}")]
    Request(u16),
    #[error("could not read response body: {0}")]
    Body(String),
}

pub trait Fetcher {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Redirects stay off: a redirect target is only ever crawled if some page
/// links to it directly.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(USER_AGENT)
        .build()
        .expect("default reqwest client")
}

impl Fetcher for reqwest::Client {
    #[tracing::instrument(skip(self))]
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String, FetchError>> + Send {
        async move {
            match self.get(url.clone()).send().await {
                Ok(resp) => match resp.text().await {
                    Ok(body) => Ok(body),
                    Err(err) => {
                        tracing::error!("{}", err.to_string());
                        Err(FetchError::Body(err.to_string()))
                    }
                },
                Err(err) => {
                    tracing::error!("{}", err.to_string());
                    Err(FetchError::Request(
                        err.status().map(|status| status.as_u16()).unwrap_or(0),
                    ))
                }
            }
        }
    }
}

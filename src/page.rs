use std::future::Future;

use scraper::{Html, Selector};
use url::Url;

use crate::fetcher::{FetchError, Fetcher};

/// Where pages come from. `probe` is a bare reachability check run before a
/// crawl starts; `get_links` yields the raw href strings of one page in
/// document order.
pub trait LinkSource: Send + Sync + Clone {
    fn probe(&self, url: &Url) -> impl Future<Output = Result<(), FetchError>> + Send;

    fn get_links(&self, url: &Url)
        -> impl Future<Output = Result<Vec<String>, FetchError>> + Send;
}

#[derive(Clone, Debug)]
pub struct Page<F = reqwest::Client> {
    fetcher: F,
}

impl<F: Fetcher + Clone> Page<F> {
    pub fn new(fetcher: F) -> Self {
        Page { fetcher }
    }
}

impl<F: Fetcher + Clone + Send + Sync> LinkSource for Page<F> {
    fn probe(&self, url: &Url) -> impl Future<Output = Result<(), FetchError>> + Send {
        async move { self.fetcher.fetch(url).await.map(|_| ()) }
    }

    #[tracing::instrument(skip(self))]
    fn get_links(
        &self,
        url: &Url,
    ) -> impl Future<Output = Result<Vec<String>, FetchError>> + Send {
        async move {
            let body = self.fetcher.fetch(url).await?;
            // Broken markup is not an error; whatever anchors parse are kept.
            let html = Html::parse_document(&body);
            let links = html
                .select(&Selector::parse("a").unwrap())
                .flat_map(|anchor| anchor.attr("href").map(str::to_string))
                .collect::<Vec<_>>();
            tracing::info!("Found {} links", links.len());
            tracing::debug!("Links {:?}", links);
            Ok(links)
        }
    }
}

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use thiserror::Error;
use tokio::{task::JoinHandle, time::sleep};
use tracing::Instrument;
use url::Url;

mod frontier;
mod jobs;

use crate::{fetcher::FetchError, link_filter, page::LinkSource};
use frontier::Frontier;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("invalid root url `{url}`: {source}")]
    InvalidRootUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("root url `{url}` is unreachable: {source}")]
    RootUnreachable { url: Url, source: FetchError },
}

/// What one page worker came back with: the children worth following, or the
/// failure that may earn it a retry.
pub enum PageOutcome {
    Children(Vec<Url>),
    Failed(FetchError),
}

pub type PageWorker = JoinHandle<(Url, PageOutcome, u8)>;

pub struct Crawler<L: LinkSource + 'static> {
    pub link_source: L,
    pub worker_pool_size: u16,
    pub max_retries: u8,
    pub initial_retry_delay_ms: u16,
    /// Caller-owned kill switch: once set, no new fetch is dispatched, no new
    /// child is admitted, and the partial visited set is returned.
    pub cancel: Arc<AtomicBool>,
}

impl<L: LinkSource + 'static> Crawler<L> {
    /// Visit every page on the root's host reachable through anchor tags.
    /// Each visited page is announced once on stdout; the full visited set is
    /// returned when no reachable page is left.
    #[tracing::instrument(skip(self))]
    pub async fn crawl(&self, root: &str) -> Result<HashSet<Url>, CrawlError> {
        let root = Url::parse(root).map_err(|source| CrawlError::InvalidRootUrl {
            url: root.to_string(),
            source,
        })?;

        // One probe before traversal. An unreachable seed must fail loudly
        // instead of coming back as an empty visited set.
        if let Err(source) = self.link_source.probe(&root).await {
            return Err(CrawlError::RootUnreachable { url: root, source });
        }

        tracing::info!("Beginning crawl");
        let mut frontier = Frontier::new(&root, self.worker_pool_size);
        if frontier.record_visit(&root) {
            println!("Page: {}", root);
        }
        frontier.push_worker(self.worker(&root, &root, 0, None));

        while let Some(handle) = frontier.next_worker() {
            match handle.await {
                Ok((_, PageOutcome::Children(children), _)) => {
                    if !self.cancelled() {
                        for child in children {
                            frontier.admit(&child, self.initial_retry_delay_ms);
                        }
                    }
                }
                Ok((url, PageOutcome::Failed(err), attempt)) => {
                    if attempt > self.max_retries || self.cancelled() {
                        // The page stays visited with zero children; one lost
                        // page never aborts the crawl.
                        tracing::warn!(%url, error = %err, "giving up on page");
                    } else {
                        frontier.requeue(&url, attempt, self.initial_retry_delay_ms);
                    }
                }
                Err(err) => tracing::error!(error = %err, "page worker panicked"),
            }

            while frontier.has_capacity() && !self.cancelled() {
                let Some(job) = frontier.next_job() else { break };
                if frontier.record_visit(&job.url) {
                    println!("Page: {}", job.url);
                }
                let delay = job.delay();
                frontier.push_worker(self.worker(&job.url, &root, job.attempt, delay));
            }
        }

        tracing::info!("Finished crawl");
        Ok(frontier.into_visited())
    }

    fn worker(&self, url_: &Url, root_: &Url, attempt: u8, delay: Option<Duration>) -> PageWorker {
        let link_source = self.link_source.clone();
        let url = url_.clone();
        let root = root_.clone();
        tokio::spawn(
            async move {
                if let Some(wait) = delay {
                    sleep(wait).await;
                }
                tracing::info!("Processing URL");
                let outcome = match link_source.get_links(&url).await {
                    Ok(links) => PageOutcome::Children(select_children(&root, links)),
                    Err(err) => PageOutcome::Failed(err),
                };
                (url, outcome, attempt + 1)
            }
            .instrument(tracing::info_span!("page", url = %url_, attempt)),
        )
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

/// Resolve, filter, and de-duplicate one page's extracted links. The batch
/// set is page-local: each child new to this page is announced here, even if
/// another page already led the crawl to it.
fn select_children(root: &Url, raw_links: Vec<String>) -> Vec<Url> {
    let mut batch = HashSet::new();
    let mut children = Vec::new();
    for raw in raw_links {
        let Some(resolved) = link_filter::resolve(root, &raw) else {
            continue;
        };
        if !link_filter::is_crawlable(&resolved) || !link_filter::is_same_domain(&resolved, root) {
            continue;
        }
        if batch.insert(resolved.clone()) {
            println!("Child Page: {}", resolved);
            children.push(resolved);
        }
    }
    children
}

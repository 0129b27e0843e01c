use std::collections::{HashSet, VecDeque};

use url::Url;

use super::{
    jobs::{Job, JobQueue},
    PageWorker,
};

/// Book-keeping for one crawl, owned by the coordinator loop alone: which
/// URLs have ever been admitted (`seen`), which were actually dispatched for
/// fetching (`visited`), the delayed-job heap, and the in-flight workers.
pub struct Frontier {
    pool_size: usize,
    seen: HashSet<Url>,
    visited: HashSet<Url>,
    jobs: JobQueue,
    workers: VecDeque<PageWorker>,
}

impl Frontier {
    pub fn new(root: &Url, pool_size: u16) -> Self {
        Frontier {
            pool_size: pool_size.max(1) as usize,
            seen: HashSet::from([root.clone()]),
            visited: HashSet::new(),
            jobs: JobQueue::new(),
            workers: VecDeque::new(),
        }
    }

    /// Check-and-mark: only a URL nobody has admitted before becomes a job.
    pub fn admit(&mut self, url: &Url, base_delay_ms: u16) {
        if self.seen.insert(url.clone()) {
            self.jobs.push(Job::new(url, 0, base_delay_ms));
        }
    }

    /// Re-schedule a failed fetch. Bypasses `seen` on purpose.
    pub fn requeue(&mut self, url: &Url, attempt: u8, base_delay_ms: u16) {
        self.jobs.push(Job::new(url, attempt, base_delay_ms));
    }

    pub fn next_job(&mut self) -> Option<Job> {
        self.jobs.pop()
    }

    /// Insertion-only; reports whether this is the first visit.
    pub fn record_visit(&mut self, url: &Url) -> bool {
        self.visited.insert(url.clone())
    }

    pub fn push_worker(&mut self, worker: PageWorker) {
        self.workers.push_back(worker);
    }

    pub fn next_worker(&mut self) -> Option<PageWorker> {
        self.workers.pop_front()
    }

    pub fn has_capacity(&self) -> bool {
        self.workers.len() < self.pool_size
    }

    pub fn into_visited(self) -> HashSet<Url> {
        self.visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admit_ignores_already_seen_urls() {
        let root = Url::parse("https://test.com/").unwrap();
        let about = Url::parse("https://test.com/about/").unwrap();
        let mut frontier = Frontier::new(&root, 10);

        // the root is pre-seeded as seen
        frontier.admit(&root, 250);
        assert!(frontier.next_job().is_none());

        frontier.admit(&about, 250);
        frontier.admit(&about, 250);
        assert_eq!(frontier.next_job().unwrap().url, about);
        assert!(frontier.next_job().is_none());
    }

    #[test]
    fn requeue_bypasses_the_seen_set() {
        let root = Url::parse("https://test.com/").unwrap();
        let mut frontier = Frontier::new(&root, 10);

        frontier.requeue(&root, 1, 1);
        let job = frontier.next_job().unwrap();
        assert_eq!(job.url, root);
        assert_eq!(job.attempt, 1);
    }

    #[test]
    fn record_visit_reports_the_first_visit_only() {
        let root = Url::parse("https://test.com/").unwrap();
        let mut frontier = Frontier::new(&root, 10);

        assert!(frontier.record_visit(&root));
        assert!(!frontier.record_visit(&root));
        assert_eq!(frontier.into_visited(), HashSet::from([root]));
    }
}

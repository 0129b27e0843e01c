use std::{cmp::Ordering, collections::BinaryHeap, time::Duration};

use jiff::Timestamp;
use url::Url;

/// One scheduled fetch. Fresh pages are due immediately; retries are due
/// after an exponential backoff on the configured base delay.
#[derive(Eq, Debug)]
pub struct Job {
    pub url: Url,
    pub attempt: u8,
    due: Timestamp,
}

impl Job {
    pub fn new(url: &Url, attempt: u8, base_delay_ms: u16) -> Self {
        let due = if attempt == 0 {
            Timestamp::now()
        } else {
            Timestamp::now()
                .checked_add(Duration::from_millis(
                    base_delay_ms as u64 * 2u64.pow(attempt as u32),
                ))
                .unwrap_or(Timestamp::MAX)
        };
        Job {
            url: url.clone(),
            attempt,
            due,
        }
    }

    /// Time left until the job is due, if any. Computed at dispatch so time
    /// spent queued counts toward the backoff.
    pub fn delay(&self) -> Option<Duration> {
        let wait = Duration::try_from(Timestamp::now().until(self.due).ok()?).ok()?;
        (wait > Duration::ZERO).then_some(wait)
    }
}

impl PartialEq for Job {
    fn eq(&self, other: &Self) -> bool {
        self.due.eq(&other.due)
    }
}

impl PartialOrd for Job {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// BinaryHeap is a max-heap; compare on reversed due time so the soonest job
// pops first.
impl Ord for Job {
    fn cmp(&self, other: &Self) -> Ordering {
        other.due.cmp(&self.due)
    }
}

pub struct JobQueue(BinaryHeap<Job>);

impl JobQueue {
    pub fn new() -> Self {
        JobQueue(BinaryHeap::new())
    }

    pub fn push(&mut self, job: Job) {
        self.0.push(job)
    }

    pub fn pop(&mut self) -> Option<Job> {
        self.0.pop()
    }
}

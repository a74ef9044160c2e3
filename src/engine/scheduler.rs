use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

use chrono::{DateTime, Local};

use super::clock;

/// Cooperative delayed-callback queue driven by the UI loop.
///
/// Jobs come out ordered by due time; jobs with the same due time come out
/// in the order they were scheduled, so one timer's callbacks never
/// overtake each other.
#[derive(Debug)]
pub struct Scheduler<J> {
    queue: BinaryHeap<Reverse<Entry<J>>>,
    seq: u64,
}

#[derive(Debug)]
struct Entry<J> {
    due: DateTime<Local>,
    seq: u64,
    job: J,
}

impl<J> PartialEq for Entry<J> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<J> Eq for Entry<J> {}

impl<J> PartialOrd for Entry<J> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<J> Ord for Entry<J> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl<J> Default for Scheduler<J> {
    fn default() -> Self {
        Scheduler {
            queue: BinaryHeap::new(),
            seq: 0,
        }
    }
}

impl<J> Scheduler<J> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `job` once `after` has elapsed from `now`.
    pub fn schedule(&mut self, now: DateTime<Local>, after: Duration, job: J) {
        let due = clock::add(now, after);
        self.seq += 1;
        self.queue.push(Reverse(Entry {
            due,
            seq: self.seq,
            job,
        }));
    }

    /// Remove and return every job due at or before `now`, in run order.
    pub fn pop_due(&mut self, now: DateTime<Local>) -> Vec<J> {
        let mut due = Vec::new();
        while let Some(Reverse(entry)) = self.queue.peek() {
            if entry.due > now {
                break;
            }
            if let Some(Reverse(entry)) = self.queue.pop() {
                due.push(entry.job);
            }
        }
        due
    }

    /// Time until the earliest job, zero if one is already due.
    pub fn next_due_in(&self, now: DateTime<Local>) -> Option<Duration> {
        self.queue
            .peek()
            .map(|Reverse(entry)| clock::until(now, entry.due))
    }

    /// Drop every pending job matching `pred`.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&J) -> bool) {
        self.queue.retain(|Reverse(entry)| !pred(&entry.job));
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

//! Crawl frontier: pending queue plus seen set
//!
//! Both collections live behind one mutex so the membership check and the
//! insertion happen as a single step. Two workers that discover the same link
//! at the same moment can never both claim it.

use crate::url::{canonicalize, CanonicalLink};
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct FrontierState {
    /// Links awaiting fetch, in discovery order
    pending: VecDeque<CanonicalLink>,

    /// Every link ever claimed during this run; only grows
    seen: HashSet<CanonicalLink>,
}

/// Thread-safe FIFO of links to visit, deduplicated by canonical form
#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FrontierState> {
        // Critical sections never panic midway, so a poisoned lock still
        // holds consistent data.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims a raw link for fetching
    ///
    /// Returns `true` if this call was the first to see the link's canonical
    /// form; the link is then appended to the pending queue. Returns `false`
    /// without side effects if it was already seen.
    pub fn try_claim(&self, raw_link: &str) -> bool {
        let link = canonicalize(raw_link);
        let mut state = self.state();
        Self::claim_locked(&mut state, link)
    }

    /// Claims every link of one page, preserving their relative order
    ///
    /// Returns how many of them were newly claimed.
    pub fn try_claim_all<I, S>(&self, raw_links: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // Canonicalize outside the lock; only the check-and-insert needs it.
        let links: Vec<CanonicalLink> = raw_links
            .into_iter()
            .map(|raw| canonicalize(raw.as_ref()))
            .collect();

        let mut state = self.state();
        let mut added = 0;
        for link in links {
            if Self::claim_locked(&mut state, link) {
                added += 1;
            }
        }
        added
    }

    fn claim_locked(state: &mut FrontierState, link: CanonicalLink) -> bool {
        if state.seen.contains(&link) {
            return false;
        }
        state.seen.insert(link.clone());
        state.pending.push_back(link);
        true
    }

    /// Removes and returns the oldest pending link, if any; never blocks
    pub fn dequeue(&self) -> Option<CanonicalLink> {
        let mut state = self.state();
        let link = state.pending.pop_front();
        if let Some(link) = &link {
            debug_assert!(
                state.seen.contains(link),
                "pending link {} missing from seen set",
                link
            );
        }
        link
    }

    /// Returns true if no link is waiting to be fetched
    ///
    /// This says nothing about whether the crawl is finished: fetches still
    /// in flight may enqueue more links.
    pub fn is_empty(&self) -> bool {
        self.state().pending.is_empty()
    }

    /// Number of links waiting to be fetched
    pub fn len(&self) -> usize {
        self.state().pending.len()
    }

    /// Number of distinct links claimed so far
    pub fn seen_count(&self) -> usize {
        self.state().seen.len()
    }
}

//! In-page key search.
//!
//! Binary search over the sorted keys array of one page, driven entirely by
//! the configured [`KeyComparator`](crate::key::KeyComparator). No locking,
//! no allocation; the caller is responsible for synchronization.

use std::cmp::Ordering;

use crate::btree::BTree;
use crate::key::KeyComparator;
use crate::page::PageView;

/// Outcome of an in-page key search.
///
/// `Found(idx)` is the slot holding the probe key. `NotFound(idx)` is the
/// slot at which the probe would be inserted to preserve order, i.e. the
/// number of keys strictly less than the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResult {
    Found(usize),
    NotFound(usize),
}

impl SearchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found(_))
    }
}

impl<C: KeyComparator> BTree<C> {
    /// Locates `key` in `page`, or the slot where it belongs.
    ///
    /// `O(log num_keys)` comparator calls. The two-slot terminal window is
    /// resolved with at most two comparisons; keys are unique, so an equal
    /// comparison identifies the only match.
    pub fn find_key_position(&self, page: &PageView<'_>, key: &[u8]) -> SearchResult {
        let n = page.num_keys();

        if n == 0 {
            return SearchResult::NotFound(0);
        }
        if n == 1 {
            return match self.cmp().compare(key, page.key_at(0)) {
                Ordering::Less => SearchResult::NotFound(0),
                Ordering::Equal => SearchResult::Found(0),
                Ordering::Greater => SearchResult::NotFound(1),
            };
        }

        let mut lo = 0;
        let mut hi = n - 1;
        loop {
            if hi - lo == 1 {
                match self.cmp().compare(key, page.key_at(lo)) {
                    Ordering::Less => return SearchResult::NotFound(lo),
                    Ordering::Equal => return SearchResult::Found(lo),
                    Ordering::Greater => {}
                }
                return match self.cmp().compare(key, page.key_at(hi)) {
                    Ordering::Less => SearchResult::NotFound(hi),
                    Ordering::Equal => SearchResult::Found(hi),
                    Ordering::Greater => SearchResult::NotFound(hi + 1),
                };
            }

            let mid = lo + (hi - lo) / 2;
            match self.cmp().compare(key, page.key_at(mid)) {
                Ordering::Less => hi = mid,
                Ordering::Equal => return SearchResult::Found(mid),
                Ordering::Greater => lo = mid,
            }
        }
    }
}

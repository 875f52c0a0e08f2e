//! # B+Tree Node Algebra
//!
//! This module implements the page-level operations of the vault index
//! B+tree: everything that touches a single page, or a pair of adjacent
//! sibling pages, lives here. A higher layer composes these primitives into
//! tree descent, root management, and rebalancing policy.
//!
//! ## Operations
//!
//! | Operation              | Lock     | Pages | Failure modes               |
//! |------------------------|----------|-------|-----------------------------|
//! | `find_key_position`    | none     | 1     | (infallible search)         |
//! | `block_find`           | shared   | 1     | `KeyNotFound`, `BadArg`     |
//! | `block_insert`         | exclusive| 1     | `NodeFull`, `DuplicateInsert`, `BadArg` |
//! | `block_delete`         | exclusive| 1     | `KeyNotFound`, `Underflow`, `BadArg` |
//! | `split_node`           | caller   | 2     | `BadArg`                    |
//! | `concat_nodes`         | caller   | 2     | `BadArg`                    |
//! | `redistribute_nodes`   | caller   | 2     | `BadArg`                    |
//!
//! The `block_*` operations borrow the caller's per-page `RwLock` for the
//! duration of the call and release it on every exit path. The structural
//! operations take no lock; the caller must hold exclusive locks on both
//! siblings, acquired in ascending page-number order.
//!
//! ## Failure atomicity
//!
//! Every failing operation leaves the page buffers byte-identical to their
//! pre-call state: all preconditions are checked before the first byte
//! moves, and the mutation order inside the exclusive section is
//! shift, store key, store value, bump counters.
//!
//! ## Per-page state machine
//!
//! ```text
//! Empty --insert--> Underfilled/Balanced --insert--> Balanced/Full
//! Full --insert--> rejected (NodeFull)
//! Balanced --delete at min_keys--> rejected (Underflow)
//! Full --split--> Balanced + Balanced
//! Balanced x2 --concat--> Full-or-less + Empty
//! Balanced x2 --redistribute--> Balanced + Balanced
//! ```
//!
//! Only the root may stay underfilled; enforcing that tree-level rule is the
//! caller's job.

mod ops;
mod search;
mod structural;

pub use search::SearchResult;

use crate::error::Result;
use crate::geometry::IndexHeader;
use crate::key::KeyComparator;
use crate::page::PageViewMut;

/// The node algebra, parameterized by index geometry and key order.
///
/// Stateless beyond its configuration: all page state lives in the buffers
/// the caller passes in, so one `BTree` value serves any number of pages and
/// threads concurrently.
pub struct BTree<C: KeyComparator> {
    header: IndexHeader,
    cmp: C,
}

impl<C: KeyComparator> BTree<C> {
    pub fn new(header: IndexHeader, cmp: C) -> Self {
        Self { header, cmp }
    }

    pub fn header(&self) -> &IndexHeader {
        &self.header
    }

    pub(crate) fn cmp(&self) -> &C {
        &self.cmp
    }

    /// Zeroes `buf` and marks it a leaf page.
    pub fn init_leaf_page(&self, buf: &mut [u8]) -> Result<()> {
        PageViewMut::init_leaf(&self.header, buf).map(|_| ())
    }

    /// Zeroes `buf` and marks it a non-leaf page.
    pub fn init_nonleaf_page(&self, buf: &mut [u8]) -> Result<()> {
        PageViewMut::init_nonleaf(&self.header, buf).map(|_| ())
    }
}

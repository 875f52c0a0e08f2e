//! Locked single-page operations.
//!
//! `block_find` takes the caller's page lock shared; `block_insert` and
//! `block_delete` take it exclusive. The lock is borrowed for exactly the
//! duration of the call and released on every exit path; no other page lock
//! is touched, so these operations cannot participate in a lock cycle.
//!
//! Inside the exclusive section the mutation order is: shift slots, store
//! key, store value, bump counters. A reader entering the critical section
//! afterwards observes the pre-state or the post-state, never a torn page.

use parking_lot::RwLock;

use crate::btree::{BTree, SearchResult};
use crate::error::{Error, Result};
use crate::key::KeyComparator;
use crate::page::{PageView, PageViewMut};

impl<C: KeyComparator> BTree<C> {
    /// Looks up `key` under a shared lock.
    ///
    /// On a hit, copies the value into `val_out` when one is supplied; a
    /// `None` output makes this an existence probe. Fails with
    /// [`Error::KeyNotFound`] on a miss.
    pub fn block_find<B: AsRef<[u8]>>(
        &self,
        lock: &RwLock<B>,
        key: &[u8],
        val_out: Option<&mut [u8]>,
    ) -> Result<()> {
        let guard = lock.read();
        let page = PageView::bind(self.header(), guard.as_ref())?;

        if key.len() != self.header().key_size() {
            return Err(Error::BadArg("key length does not match index key size"));
        }

        let idx = match self.find_key_position(&page, key) {
            SearchResult::Found(idx) => idx,
            SearchResult::NotFound(_) => return Err(Error::KeyNotFound),
        };

        if let Some(out) = val_out {
            if out.len() != page.val_size() {
                return Err(Error::BadArg("value buffer length does not match value size"));
            }
            out.copy_from_slice(page.val_at(idx));
        }
        Ok(())
    }

    /// Inserts `key -> val` under an exclusive lock.
    ///
    /// Fails with [`Error::NodeFull`] when the page already holds
    /// `max_keys` entries (split, then retry) and with
    /// [`Error::DuplicateInsert`] when the key is present. On failure the
    /// page is unmodified.
    pub fn block_insert<B: AsMut<[u8]>>(
        &self,
        lock: &RwLock<B>,
        key: &[u8],
        val: &[u8],
    ) -> Result<()> {
        let mut guard = lock.write();
        let mut page = PageViewMut::bind(self.header(), guard.as_mut())?;

        if key.len() != self.header().key_size() {
            return Err(Error::BadArg("key length does not match index key size"));
        }
        if val.len() != page.val_size() {
            return Err(Error::BadArg("value length does not match value size"));
        }

        let n = page.num_keys();
        if n + 1 > self.header().max_keys(page.page_type()) {
            return Err(Error::NodeFull);
        }

        let idx = match self.find_key_position(&page.as_view(), key) {
            SearchResult::Found(_) => return Err(Error::DuplicateInsert),
            SearchResult::NotFound(idx) => idx,
        };

        // an empty page accepts slot 0 with no shift; on a non-leaf the
        // value range spans num_vals slots so the tail child moves too
        let nv = page.num_vals();
        if idx < n {
            page.copy_keys_within(idx, idx + 1, n - idx);
        }
        if idx < nv {
            page.copy_vals_within(idx, idx + 1, nv - idx);
        }

        page.write_key(idx, key);
        page.write_val(idx, val);
        page.set_num_keys(n + 1);
        Ok(())
    }

    /// Deletes `key` under an exclusive lock.
    ///
    /// Fails with [`Error::KeyNotFound`] when the key is absent and with
    /// [`Error::Underflow`] when the page sits at `min_keys` (redistribute
    /// or concatenate with a sibling, then retry). On failure the page is
    /// unmodified.
    pub fn block_delete<B: AsMut<[u8]>>(&self, lock: &RwLock<B>, key: &[u8]) -> Result<()> {
        let mut guard = lock.write();
        let mut page = PageViewMut::bind(self.header(), guard.as_mut())?;

        if key.len() != self.header().key_size() {
            return Err(Error::BadArg("key length does not match index key size"));
        }

        let idx = match self.find_key_position(&page.as_view(), key) {
            SearchResult::Found(idx) => idx,
            SearchResult::NotFound(_) => return Err(Error::KeyNotFound),
        };

        let n = page.num_keys();
        if n <= self.header().min_keys(page.page_type()) {
            return Err(Error::Underflow);
        }

        let nv = page.num_vals();
        if idx + 1 < n {
            page.copy_keys_within(idx + 1, idx, n - idx - 1);
        }
        if idx + 1 < nv {
            page.copy_vals_within(idx + 1, idx, nv - idx - 1);
        }
        page.set_num_keys(n - 1);
        Ok(())
    }
}

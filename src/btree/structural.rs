//! Structural operations on sibling pairs.
//!
//! `split_node`, `concat_nodes`, and `redistribute_nodes` rebalance keys
//! between two adjacent same-type pages. None of them locks: the caller
//! holds exclusive locks on both pages (and on the parent when it will
//! absorb or update a promotion key), acquired in ascending page-number
//! order.
//!
//! Every precondition is validated before the first byte moves, so a
//! failing call leaves both buffers untouched. Updating the parent's
//! separator keys - and, on non-leaf merges, reconciling the one child
//! pointer the dropped separator used to govern - is the caller's job.

use crate::btree::BTree;
use crate::error::{Error, Result};
use crate::key::KeyComparator;
use crate::page::PageViewMut;

impl<C: KeyComparator> BTree<C> {
    /// Splits a full page, moving its upper half into an empty sibling.
    ///
    /// `full` must hold exactly `max_keys` entries and `empty` none; both
    /// must be the same page type. The promotion key - the smallest key
    /// left on the new right-hand sibling - is written to `key_out` for the
    /// parent to absorb. Both pages end up exactly half full.
    pub fn split_node(
        &self,
        full: &mut [u8],
        empty: &mut [u8],
        key_out: &mut [u8],
    ) -> Result<()> {
        let mut full = PageViewMut::bind(self.header(), full)?;
        let mut empty = PageViewMut::bind(self.header(), empty)?;

        let pt = full.page_type();
        if empty.page_type() != pt {
            return Err(Error::BadArg("split requires siblings of the same page type"));
        }
        let max = self.header().max_keys(pt);
        if full.num_keys() != max {
            return Err(Error::BadArg("split source page is not full"));
        }
        if empty.num_keys() != 0 {
            return Err(Error::BadArg("split target page is not empty"));
        }
        if key_out.len() != self.header().key_size() {
            return Err(Error::BadArg("promotion key buffer length does not match key size"));
        }

        let mid = max / 2;
        let n_move = max - mid;

        empty.copy_keys_from(&full, mid, 0, n_move);
        key_out.copy_from_slice(full.as_view().key_at(mid));
        // on a non-leaf the range [mid..num_vals) also carries the tail child
        empty.copy_vals_from(&full, mid, 0, full.num_vals() - mid);

        full.set_num_keys(mid);
        empty.set_num_keys(n_move);
        Ok(())
    }

    /// Merges `src` into `dst`, draining `src`.
    ///
    /// Both pages must be the same type and their combined key count must
    /// fit in one page. `dst_is_first` states the key order: `true` means
    /// every key in `dst` is less than every key in `src`, `false` the
    /// mirror; the caller must report it truthfully, the pages cannot
    /// check it. The tail child of whichever sibling is last in key order
    /// survives as the merged page's tail.
    pub fn concat_nodes(&self, dst: &mut [u8], src: &mut [u8], dst_is_first: bool) -> Result<()> {
        let mut dst = PageViewMut::bind(self.header(), dst)?;
        let mut src = PageViewMut::bind(self.header(), src)?;

        let pt = dst.page_type();
        if src.page_type() != pt {
            return Err(Error::BadArg("concat requires siblings of the same page type"));
        }
        let (dn, sn) = (dst.num_keys(), src.num_keys());
        if dn + sn > self.header().max_keys(pt) {
            return Err(Error::BadArg("merged page would overflow"));
        }

        if dst_is_first {
            dst.copy_keys_from(&src, 0, dn, sn);
            dst.copy_vals_from(&src, 0, dn, src.num_vals());
        } else {
            dst.copy_keys_within(0, sn, dn);
            dst.copy_vals_within(0, sn, dst.num_vals());
            dst.copy_keys_from(&src, 0, 0, sn);
            dst.copy_vals_from(&src, 0, 0, sn);
        }

        dst.set_num_keys(dn + sn);
        src.set_num_keys(0);
        Ok(())
    }

    /// Rebalances two siblings so both satisfy the half-full invariant.
    ///
    /// `n1` must precede `n2` in key order and both must be the same page
    /// type. The fuller side donates key/value pairs until the deficient
    /// side reaches `min_keys`; if neither side is deficient the call is a
    /// no-op. Fails with `BadArg` when the combined count cannot satisfy
    /// `2 * min_keys` - the caller should concatenate instead. The parent's
    /// separator for the pair must be refreshed by the caller afterwards.
    pub fn redistribute_nodes(&self, n1: &mut [u8], n2: &mut [u8]) -> Result<()> {
        let mut n1 = PageViewMut::bind(self.header(), n1)?;
        let mut n2 = PageViewMut::bind(self.header(), n2)?;

        let pt = n1.page_type();
        if n2.page_type() != pt {
            return Err(Error::BadArg("redistribute requires siblings of the same page type"));
        }
        let min = self.header().min_keys(pt);
        let (a, b) = (n1.num_keys(), n2.num_keys());
        if a + b < 2 * min {
            return Err(Error::BadArg("siblings hold too few keys to redistribute"));
        }

        if a >= b {
            let needs = min.saturating_sub(b);
            if needs == 0 {
                return Ok(());
            }
            // make room at the front of n2, then move n1's top pairs over
            n2.copy_keys_within(0, needs, b);
            n2.copy_vals_within(0, needs, n2.num_vals());
            n2.copy_keys_from(&n1, a - needs, 0, needs);
            n2.copy_vals_from(&n1, a - needs, 0, needs);
            n1.set_num_keys(a - needs);
            n2.set_num_keys(b + needs);
        } else {
            let needs = min.saturating_sub(a);
            if needs == 0 {
                return Ok(());
            }
            // append n2's first pairs to n1, then close the gap in n2; on a
            // non-leaf the extra slot gives n1 its new tail child
            n1.copy_keys_from(&n2, 0, a, needs);
            n1.copy_vals_from(&n2, 0, a, needs + pt.extra_vals());
            n2.copy_keys_within(needs, 0, b - needs);
            n2.copy_vals_within(needs, 0, n2.num_vals() - needs);
            n1.set_num_keys(a + needs);
            n2.set_num_keys(b - needs);
        }
        Ok(())
    }
}

//! # Index Geometry
//!
//! Every page in an index shares one geometry, fixed at index creation:
//! given `(page_size, key_size, value_size)` this module derives, per page
//! type, how many keys fit (`max_keys`), the B+tree lower bound
//! (`min_keys`), and the byte offsets of the value and key arrays. The
//! resulting [`IndexHeader`] maps directly onto the index descriptor page
//! the file layer persists, so all fields are public plain data.
//!
//! ## Derivation
//!
//! ```text
//! per_key(leaf)     = key_size + value_size
//! max_keys(leaf)    = (page_size - 8) / per_key(leaf)        rounded down to even
//!
//! per_key(nonleaf)  = key_size + 4
//! max_keys(nonleaf) = (page_size - 8 - 4) / per_key(nonleaf) rounded down to even
//!
//! min_keys(t)       = max_keys(t) / 2
//! ```
//!
//! The extra `- 4` on non-leaf pages reserves the one additional child slot
//! a node with k keys needs for its k+1 children; that slot lives at the end
//! of the values array, so the non-leaf values slab is `max_keys + 1` slots
//! wide and the non-leaf keys array starts after it. Rounding capacities
//! down to an even count gives splits a clean midpoint.
//!
//! Centralizing the slab arithmetic here keeps every byte shift in the
//! algebra expressed as slot count times slot size against one set of
//! offsets.

use crate::error::{Error, Result};
use crate::page::{PageType, PAGE_HEADER_SIZE};

/// Width of a child page number in non-leaf values, in bytes.
pub const CHILD_PTR_SIZE: usize = 4;

/// Creation-time parameters of an index.
///
/// `value_size` is the leaf payload width; non-leaf values are always
/// 4-byte child page numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexParams {
    /// Page size in bytes. Should be a multiple of the fs block size.
    pub page_size: u32,
    /// Key size in bytes.
    pub key_size: u32,
    /// Leaf payload size in bytes.
    pub value_size: u32,
}

/// Geometry of every page in one index, immutable after creation.
///
/// The per-type arrays are indexed by [`PageType`] (`NonLeaf = 0`,
/// `Leaf = 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexHeader {
    /// Page size in bytes.
    pub page_size: u32,
    /// Key size in bytes.
    pub key_size: u32,
    /// Value size per page type.
    pub val_size: [u32; 2],
    /// Key capacity per page type.
    pub max_keys: [u32; 2],
    /// B+tree half-full lower bound per page type.
    pub min_keys: [u32; 2],
}

impl IndexHeader {
    /// Derives a full geometry from creation parameters.
    ///
    /// Fails with [`Error::Config`] when the page cannot hold at least two
    /// keys of either kind, when a computed capacity rounds to zero, when
    /// `key_size` is zero, or when a capacity exceeds the one-byte on-page
    /// key counter.
    pub fn compute(params: &IndexParams) -> Result<Self> {
        if params.key_size == 0 {
            return Err(Error::Config("key_size must be non-zero".into()));
        }

        let ps = params.page_size as u64;
        let ks = params.key_size as u64;
        let vs = params.value_size as u64;
        let hdr = PAGE_HEADER_SIZE as u64;
        let ptr = CHILD_PTR_SIZE as u64;

        let floor = hdr + (ks + vs.min(ptr)) * 2;
        if ps < floor {
            return Err(Error::Config(format!(
                "page_size {} cannot hold two keys (need at least {})",
                params.page_size, floor
            )));
        }

        let nonleaf = Self::fanout(ps.saturating_sub(hdr + ptr), ks + ptr, "non-leaf")?;
        let leaf = Self::fanout(ps.saturating_sub(hdr), ks + vs, "leaf")?;

        Ok(Self {
            page_size: params.page_size,
            key_size: params.key_size,
            val_size: [CHILD_PTR_SIZE as u32, params.value_size],
            max_keys: [nonleaf, leaf],
            min_keys: [nonleaf / 2, leaf / 2],
        })
    }

    fn fanout(usable: u64, per_key: u64, kind: &str) -> Result<u32> {
        // even capacity gives split a clean midpoint
        let n = (usable / per_key) & !1;
        if n == 0 {
            return Err(Error::Config(format!("{kind} page holds no keys")));
        }
        if n > u8::MAX as u64 {
            return Err(Error::Config(format!(
                "{kind} capacity {n} exceeds the one-byte key counter"
            )));
        }
        Ok(n as u32)
    }

    pub fn page_size(&self) -> usize {
        self.page_size as usize
    }

    pub fn key_size(&self) -> usize {
        self.key_size as usize
    }

    pub fn val_size(&self, t: PageType) -> usize {
        self.val_size[t as usize] as usize
    }

    pub fn max_keys(&self, t: PageType) -> usize {
        self.max_keys[t as usize] as usize
    }

    pub fn min_keys(&self, t: PageType) -> usize {
        self.min_keys[t as usize] as usize
    }

    /// Slot capacity of the values array: `max_keys`, plus the extra child
    /// slot on non-leaf pages.
    pub fn val_capacity(&self, t: PageType) -> usize {
        self.max_keys(t) + t.extra_vals()
    }

    /// Byte offset of the values array. Constant for all pages.
    pub fn vals_offset(&self) -> usize {
        PAGE_HEADER_SIZE
    }

    /// Byte offset of the keys array, a function of geometry alone:
    /// independent of how full the page is.
    pub fn keys_offset(&self, t: PageType) -> usize {
        PAGE_HEADER_SIZE + self.val_capacity(t) * self.val_size(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_geometry_on_4k_pages() {
        let ih = IndexHeader::compute(&IndexParams {
            page_size: 4096,
            key_size: 16,
            value_size: 8,
        })
        .unwrap();

        // (4096 - 8) / 24 = 170, already even
        assert_eq!(ih.max_keys(PageType::Leaf), 170);
        assert_eq!(ih.min_keys(PageType::Leaf), 85);
        // (4096 - 8 - 4) / 20 = 204, already even
        assert_eq!(ih.max_keys(PageType::NonLeaf), 204);
        assert_eq!(ih.min_keys(PageType::NonLeaf), 102);

        assert_eq!(ih.val_size(PageType::Leaf), 8);
        assert_eq!(ih.val_size(PageType::NonLeaf), CHILD_PTR_SIZE);
    }

    #[test]
    fn capacities_round_down_to_even() {
        // (35 - 8) / 9 = 3 exactly; rounds to 2
        let ih = IndexHeader::compute(&IndexParams {
            page_size: 35,
            key_size: 1,
            value_size: 8,
        })
        .unwrap();

        assert_eq!(ih.max_keys(PageType::Leaf), 2);
        assert_eq!(ih.min_keys(PageType::Leaf), 1);
    }

    #[test]
    fn keys_offset_is_fill_independent() {
        let ih = IndexHeader::compute(&IndexParams {
            page_size: 188,
            key_size: 1,
            value_size: 8,
        })
        .unwrap();

        assert_eq!(ih.max_keys(PageType::Leaf), 20);
        assert_eq!(ih.min_keys(PageType::Leaf), 10);
        assert_eq!(ih.vals_offset(), 8);
        assert_eq!(ih.keys_offset(PageType::Leaf), 8 + 20 * 8);

        // non-leaf values carry the extra child slot
        let nl_max = ih.max_keys(PageType::NonLeaf);
        assert_eq!(ih.val_capacity(PageType::NonLeaf), nl_max + 1);
        assert_eq!(ih.keys_offset(PageType::NonLeaf), 8 + (nl_max + 1) * 4);
    }

    #[test]
    fn nonleaf_layout_fits_in_page() {
        for page_size in [35u32, 64, 80, 188, 512, 4096] {
            for key_size in [1u32, 4, 16] {
                let Ok(ih) = IndexHeader::compute(&IndexParams {
                    page_size,
                    key_size,
                    value_size: 8,
                }) else {
                    continue;
                };
                for t in [PageType::NonLeaf, PageType::Leaf] {
                    let end = ih.keys_offset(t) + ih.max_keys(t) * ih.key_size();
                    assert!(end <= ih.page_size(), "{t:?} overruns page: {end}");
                }
            }
        }
    }

    #[test]
    fn rejects_zero_key_size() {
        let err = IndexHeader::compute(&IndexParams {
            page_size: 4096,
            key_size: 0,
            value_size: 8,
        })
        .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_page_too_small_for_two_keys() {
        let err = IndexHeader::compute(&IndexParams {
            page_size: 16,
            key_size: 16,
            value_size: 8,
        })
        .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_zero_fanout() {
        // two leaf keys fit, but no non-leaf key does
        let err = IndexHeader::compute(&IndexParams {
            page_size: 20,
            key_size: 2,
            value_size: 1,
        })
        .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_capacity_beyond_counter_width() {
        // (4096 - 8) / 9 = 454 leaf keys, more than a u8 can count
        let err = IndexHeader::compute(&IndexParams {
            page_size: 4096,
            key_size: 1,
            value_size: 8,
        })
        .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
    }
}

//! # Page Views
//!
//! A page view is a transient, borrowed `{header, vals, keys}` triple over a
//! raw page buffer owned by the surrounding buffer pool. Binding a view
//! reads the page-type byte, then splits the buffer at offsets derived from
//! the [`IndexHeader`] geometry alone:
//!
//! ```text
//! +--------+--------------------------+------------------+
//! | header | values                   | keys             |
//! | 8B     | val_capacity * val_size  | max_keys *       |
//! |        |                          | key_size         |
//! +--------+--------------------------+------------------+
//! ```
//!
//! Binding is zero-copy and performs no allocation. Views never outlive the
//! buffer borrow, and the algebra derives a fresh view on every call rather
//! than caching one across operations.
//!
//! ## Uninitialized payload
//!
//! Bytes past `num_keys` slots in either array are not contractually zeroed;
//! the slot accessors must only be asked for occupied slots.
//!
//! ## Zero-Copy Guarantees
//!
//! `key_at` / `val_at` return slices pointing directly into the page buffer.
//! `PageViewMut` mutates the buffer in place; all slot shifts are contiguous
//! overlap-safe byte moves expressed as slot count times slot size.

use crate::error::{Error, Result};
use crate::geometry::{IndexHeader, CHILD_PTR_SIZE};
use crate::page::{PageHeader, PageType, PAGE_HEADER_SIZE, PAGE_TYPE_OFFSET};

/// Read-only view over a page buffer.
#[derive(Debug)]
pub struct PageView<'a> {
    header: &'a PageHeader,
    vals: &'a [u8],
    keys: &'a [u8],
    page_type: PageType,
    key_size: usize,
    val_size: usize,
}

/// Mutable view over a page buffer.
pub struct PageViewMut<'a> {
    header: &'a mut PageHeader,
    vals: &'a mut [u8],
    keys: &'a mut [u8],
    page_type: PageType,
    key_size: usize,
    val_size: usize,
}

fn check_layout(ih: &IndexHeader, buf_len: usize) -> Result<()> {
    if buf_len != ih.page_size() {
        return Err(Error::BadArg("page buffer length does not match page size"));
    }
    for t in [PageType::NonLeaf, PageType::Leaf] {
        if ih.keys_offset(t) + ih.max_keys(t) * ih.key_size() > ih.page_size() {
            return Err(Error::BadArg("geometry overruns the page"));
        }
    }
    if ih.val_size(PageType::NonLeaf) != CHILD_PTR_SIZE {
        return Err(Error::BadArg("non-leaf value size must be a child pointer"));
    }
    Ok(())
}

fn page_type_of(buf: &[u8]) -> Result<PageType> {
    PageType::from_byte(buf[PAGE_TYPE_OFFSET]).ok_or(Error::BadArg("unrecognized page type byte"))
}

impl<'a> PageView<'a> {
    /// Binds a read-only view. Validates buffer length, the page-type byte,
    /// the pad byte, and that the geometry fits the page.
    pub fn bind(ih: &IndexHeader, buf: &'a [u8]) -> Result<Self> {
        check_layout(ih, buf.len())?;
        let page_type = page_type_of(buf)?;

        let header = PageHeader::from_bytes(buf)?;
        if header.pad() != 0 {
            return Err(Error::BadArg("page header pad byte must be zero"));
        }

        let val_size = ih.val_size(page_type);
        let vals_len = ih.val_capacity(page_type) * val_size;
        let keys_len = ih.max_keys(page_type) * ih.key_size();

        Ok(Self {
            header,
            vals: &buf[PAGE_HEADER_SIZE..PAGE_HEADER_SIZE + vals_len],
            keys: &buf[ih.keys_offset(page_type)..ih.keys_offset(page_type) + keys_len],
            page_type,
            key_size: ih.key_size(),
            val_size,
        })
    }

    pub fn page_type(&self) -> PageType {
        self.page_type
    }

    pub fn num_keys(&self) -> usize {
        self.header.num_keys() as usize
    }

    pub fn num_vals(&self) -> usize {
        self.header.num_vals() as usize
    }

    pub fn parent_page(&self) -> u32 {
        self.header.parent_page()
    }

    pub fn key_size(&self) -> usize {
        self.key_size
    }

    pub fn val_size(&self) -> usize {
        self.val_size
    }

    /// Key bytes at slot `idx`. `idx` must address an occupied slot.
    pub fn key_at(&self, idx: usize) -> &'a [u8] {
        debug_assert!(idx < self.num_keys());
        &self.keys[idx * self.key_size..(idx + 1) * self.key_size]
    }

    /// Value bytes at slot `idx`. `idx` must address an occupied slot.
    pub fn val_at(&self, idx: usize) -> &'a [u8] {
        debug_assert!(idx < self.num_vals());
        &self.vals[idx * self.val_size..(idx + 1) * self.val_size]
    }

    /// Child page number at slot `idx` of a non-leaf page.
    pub fn child_at(&self, idx: usize) -> u32 {
        debug_assert_eq!(self.page_type, PageType::NonLeaf);
        // INVARIANT: bind rejects non-leaf geometries whose value slot is not 4 bytes
        u32::from_ne_bytes(self.val_at(idx).try_into().unwrap())
    }

    /// Rightmost child of a non-leaf page: the extra value slot at index
    /// `num_keys`.
    pub fn rightmost_child(&self) -> u32 {
        self.child_at(self.num_keys())
    }
}

impl<'a> PageViewMut<'a> {
    /// Binds a mutable view. Same validation as [`PageView::bind`].
    pub fn bind(ih: &IndexHeader, buf: &'a mut [u8]) -> Result<Self> {
        check_layout(ih, buf.len())?;
        let page_type = page_type_of(buf)?;

        let val_size = ih.val_size(page_type);
        let vals_len = ih.val_capacity(page_type) * val_size;
        let keys_len = ih.max_keys(page_type) * ih.key_size();

        let (hdr_bytes, rest) = buf.split_at_mut(PAGE_HEADER_SIZE);
        let (vals, rest) = rest.split_at_mut(vals_len);
        let keys = &mut rest[..keys_len];

        let header = PageHeader::from_bytes_mut(hdr_bytes)?;
        if header.pad() != 0 {
            return Err(Error::BadArg("page header pad byte must be zero"));
        }

        Ok(Self {
            header,
            vals,
            keys,
            page_type,
            key_size: ih.key_size(),
            val_size,
        })
    }

    /// Zeroes the page, marks it a leaf, and binds a view over it.
    pub fn init_leaf(ih: &IndexHeader, buf: &'a mut [u8]) -> Result<Self> {
        Self::init(ih, buf, PageType::Leaf)
    }

    /// Zeroes the page, marks it non-leaf, and binds a view over it.
    pub fn init_nonleaf(ih: &IndexHeader, buf: &'a mut [u8]) -> Result<Self> {
        Self::init(ih, buf, PageType::NonLeaf)
    }

    fn init(ih: &IndexHeader, buf: &'a mut [u8], page_type: PageType) -> Result<Self> {
        check_layout(ih, buf.len())?;
        buf.fill(0);
        buf[PAGE_TYPE_OFFSET] = page_type as u8;
        Self::bind(ih, buf)
    }

    /// Reborrows as a read-only view.
    pub fn as_view(&self) -> PageView<'_> {
        PageView {
            header: self.header,
            vals: self.vals,
            keys: self.keys,
            page_type: self.page_type,
            key_size: self.key_size,
            val_size: self.val_size,
        }
    }

    pub fn page_type(&self) -> PageType {
        self.page_type
    }

    pub fn num_keys(&self) -> usize {
        self.header.num_keys() as usize
    }

    pub fn num_vals(&self) -> usize {
        self.header.num_vals() as usize
    }

    pub fn parent_page(&self) -> u32 {
        self.header.parent_page()
    }

    pub fn set_parent_page(&mut self, page_no: u32) {
        self.header.set_parent_page(page_no);
    }

    pub fn val_size(&self) -> usize {
        self.val_size
    }

    /// Child page number at slot `idx` of a non-leaf page.
    pub fn child_at(&self, idx: usize) -> u32 {
        self.as_view().child_at(idx)
    }

    /// Rightmost child of a non-leaf page.
    pub fn rightmost_child(&self) -> u32 {
        self.as_view().rightmost_child()
    }

    /// Stores the rightmost child of a non-leaf page in the extra value
    /// slot at index `num_keys`.
    pub fn set_rightmost_child(&mut self, page_no: u32) {
        debug_assert_eq!(self.page_type, PageType::NonLeaf);
        let idx = self.num_keys();
        self.write_val(idx, &page_no.to_ne_bytes());
        if self.header.num_vals() as usize <= idx {
            self.header.set_num_vals(idx as u8 + 1);
        }
    }

    /// Sets the key count and re-derives `num_vals` from the page type.
    pub(crate) fn set_num_keys(&mut self, n: usize) {
        let nv = n + self.page_type.extra_vals();
        debug_assert!(nv <= u8::MAX as usize);
        self.header.set_num_keys(n as u8);
        self.header.set_num_vals(nv as u8);
    }

    pub(crate) fn write_key(&mut self, slot: usize, key: &[u8]) {
        debug_assert_eq!(key.len(), self.key_size);
        self.keys[slot * self.key_size..(slot + 1) * self.key_size].copy_from_slice(key);
    }

    pub(crate) fn write_val(&mut self, slot: usize, val: &[u8]) {
        debug_assert_eq!(val.len(), self.val_size);
        self.vals[slot * self.val_size..(slot + 1) * self.val_size].copy_from_slice(val);
    }

    /// Overlap-safe move of `n_slots` key slots within the page.
    pub(crate) fn copy_keys_within(&mut self, src_slot: usize, dst_slot: usize, n_slots: usize) {
        let ks = self.key_size;
        self.keys
            .copy_within(src_slot * ks..(src_slot + n_slots) * ks, dst_slot * ks);
    }

    /// Overlap-safe move of `n_slots` value slots within the page.
    pub(crate) fn copy_vals_within(&mut self, src_slot: usize, dst_slot: usize, n_slots: usize) {
        let vs = self.val_size;
        self.vals
            .copy_within(src_slot * vs..(src_slot + n_slots) * vs, dst_slot * vs);
    }

    /// Copies `n_slots` key slots from a sibling page.
    pub(crate) fn copy_keys_from(
        &mut self,
        src: &PageViewMut<'_>,
        src_slot: usize,
        dst_slot: usize,
        n_slots: usize,
    ) {
        let ks = self.key_size;
        self.keys[dst_slot * ks..(dst_slot + n_slots) * ks]
            .copy_from_slice(&src.keys[src_slot * ks..(src_slot + n_slots) * ks]);
    }

    /// Copies `n_slots` value slots from a sibling page.
    pub(crate) fn copy_vals_from(
        &mut self,
        src: &PageViewMut<'_>,
        src_slot: usize,
        dst_slot: usize,
        n_slots: usize,
    ) {
        let vs = self.val_size;
        self.vals[dst_slot * vs..(dst_slot + n_slots) * vs]
            .copy_from_slice(&src.vals[src_slot * vs..(src_slot + n_slots) * vs]);
    }
}

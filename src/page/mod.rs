//! # Page Types and Header Layout
//!
//! Every index page begins with a fixed 8-byte header. The header is packed
//! and 32-bit aligned so the values array can follow immediately on a 4-byte
//! boundary.
//!
//! ## Page Header Layout (8 bytes)
//!
//! ```text
//! Offset  Size  Field        Description
//! ------  ----  -----------  -----------------------------------------
//! 0       4     parent_page  Page number of the parent; ignored in root
//! 4       1     num_keys     Current key count
//! 5       1     num_vals     Leaf: num_keys. Non-leaf: num_keys + 1
//! 6       1     page_type    0 = non-leaf, 1 = leaf
//! 7       1     pad          Must be zero
//! ```
//!
//! ## Zero-Copy Access
//!
//! `PageHeader` uses `zerocopy` for safe transmutation from raw page bytes,
//! so headers are read and written in place without copying:
//!
//! ```text
//! let header = PageHeader::from_bytes(&page[..8])?;
//! ```
//!
//! The struct is `Unaligned`: page buffers come from the caller and carry no
//! alignment guarantee, so the parent page number is stored through an
//! unaligned native-endian word. All on-page integers are host byte order;
//! index files are not portable across architectures.
//!
//! ## Thread Safety
//!
//! `PageHeader` is plain data with no synchronization. The lock protecting
//! the surrounding page buffer governs access.

mod view;

pub use view::{PageView, PageViewMut};

use zerocopy::byteorder::{NativeEndian, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::error::{Error, Result};

/// On-page header size in bytes.
pub const PAGE_HEADER_SIZE: usize = 8;

/// Byte offset of the `page_type` field within the header.
pub(crate) const PAGE_TYPE_OFFSET: usize = 6;

/// Kind of a page. Doubles as the index into the per-type geometry tables.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    /// Routing page: values are 32-bit child page numbers.
    NonLeaf = 0,
    /// Data page: values are user payload bytes.
    Leaf = 1,
}

impl PageType {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(PageType::NonLeaf),
            1 => Some(PageType::Leaf),
            _ => None,
        }
    }

    /// Extra value slots beyond `num_keys`: a non-leaf node with k keys has
    /// k + 1 children, the last stored at the end of the values array.
    pub(crate) fn extra_vals(self) -> usize {
        match self {
            PageType::NonLeaf => 1,
            PageType::Leaf => 0,
        }
    }
}

/// Initial bytes of every index page.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct PageHeader {
    parent_page: U32<NativeEndian>,
    num_keys: u8,
    num_vals: u8,
    page_type: u8,
    pad: u8,
}

impl PageHeader {
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        if data.len() < PAGE_HEADER_SIZE {
            return Err(Error::BadArg("buffer too small for page header"));
        }
        Self::ref_from_bytes(&data[..PAGE_HEADER_SIZE])
            .map_err(|_| Error::BadArg("failed to bind page header"))
    }

    pub fn from_bytes_mut(data: &mut [u8]) -> Result<&mut Self> {
        if data.len() < PAGE_HEADER_SIZE {
            return Err(Error::BadArg("buffer too small for page header"));
        }
        Self::mut_from_bytes(&mut data[..PAGE_HEADER_SIZE])
            .map_err(|_| Error::BadArg("failed to bind page header"))
    }

    pub fn parent_page(&self) -> u32 {
        self.parent_page.get()
    }

    pub fn set_parent_page(&mut self, page_no: u32) {
        self.parent_page = U32::new(page_no);
    }

    pub fn num_keys(&self) -> u8 {
        self.num_keys
    }

    pub(crate) fn set_num_keys(&mut self, n: u8) {
        self.num_keys = n;
    }

    pub fn num_vals(&self) -> u8 {
        self.num_vals
    }

    pub(crate) fn set_num_vals(&mut self, n: u8) {
        self.num_vals = n;
    }

    pub fn page_type(&self) -> Option<PageType> {
        PageType::from_byte(self.page_type)
    }

    pub fn pad(&self) -> u8 {
        self.pad
    }
}

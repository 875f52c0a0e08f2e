//! # vaultidx - B+Tree Index Core
//!
//! vaultidx is the indexing component of the vault backup store. It implements
//! the page-level node algebra of an on-disk B+tree over fixed-width keys
//! (typically 16-byte UUIDs) and fixed-width values: user payload bytes in
//! leaf pages, 32-bit child page numbers in non-leaf pages.
//!
//! ## Scale
//!
//! With 4KB pages and UUID keys a non-leaf page routes ~204 children and a
//! leaf page holds 170 entries, so five tree levels cover roughly 75 billion
//! keys in about 1TB of index pages. 32-bit page numbers are sufficient for
//! that range.
//!
//! ## Architecture Overview
//!
//! The crate factors into three layers, leaves first:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Node Algebra (BTree<C>)                     │
//! │  find / insert / delete under a page lock,   │
//! │  split / concat / redistribute on siblings   │
//! ├──────────────────────────────────────────────┤
//! │  Page Views (PageView / PageViewMut)         │
//! │  borrowed {header, vals, keys} over a buffer │
//! ├──────────────────────────────────────────────┤
//! │  Geometry (IndexHeader)                      │
//! │  fan-out and byte offsets from page/key/val  │
//! │  sizes, fixed at index creation              │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Page buffers are owned by the surrounding buffer pool and handed in as
//! byte borrows. The core never allocates pages, never performs I/O, and
//! never retains references across calls: every operation binds a fresh view
//! over the buffer, mutates bytes in place under the caller's lock, and
//! returns.
//!
//! ## Page Layout
//!
//! ```text
//! +--------+----------------------+----------------+
//! | header | array of values      | array of keys  |
//! | (8B)   | (capacity max_keys)  | (capacity      |
//! |        |                      |  max_keys)     |
//! +--------+----------------------+----------------+
//! ```
//!
//! The values array is pre-sized to the page-type capacity rather than the
//! current key count, so the keys array lives at a constant offset derived
//! from the [`IndexHeader`] alone. In non-leaf pages the values array has one
//! extra slot: a node with k keys routes k+1 children, and the extra child
//! pointer is stored at the end of the array.
//!
//! All multi-byte on-page fields are host byte order. Index files are
//! explicitly not portable across architectures.
//!
//! ## Concurrency
//!
//! One reader/writer lock per page buffer, owned by the caller.
//! [`BTree::block_find`] takes it shared; [`BTree::block_insert`] and
//! [`BTree::block_delete`] take it exclusive. The structural operations take
//! no lock: the caller holds exclusive locks on both siblings (and the
//! parent, when it will absorb a promotion key), acquiring them in ascending
//! page-number order.
//!
//! ## Out of Scope
//!
//! Tree descent, parent-pointer maintenance, free-page management, file I/O,
//! buffer pooling, and write-ahead logging all live in the layers that wrap
//! this crate.

pub mod btree;
pub mod error;
pub mod geometry;
pub mod key;
pub mod page;
pub mod serial;

pub use btree::{BTree, SearchResult};
pub use error::{Error, Result};
pub use geometry::{IndexHeader, IndexParams, CHILD_PTR_SIZE};
pub use key::{ByteKey, KeyComparator, UuidKey};
pub use page::{PageHeader, PageType, PageView, PageViewMut, PAGE_HEADER_SIZE};
pub use serial::{SerialBuffer, SerialError};

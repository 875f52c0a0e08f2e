//! Error types for the index core.
//!
//! Every failure mode of the node algebra is a distinct variant so callers
//! can branch on the kind: `NodeFull` means split and retry, `Underflow`
//! means redistribute or concatenate with a sibling first, `DuplicateInsert`
//! surfaces to the user, `KeyNotFound` is the expected miss. A failing
//! operation always leaves the page bytes identical to the pre-call state.

use thiserror::Error;

/// Result type alias for index core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the index core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A structural precondition was violated: wrong page type, mismatched
    /// buffer length, unrecognized header bytes. Fix the caller; never retry
    /// blindly.
    #[error("bad argument: {0}")]
    BadArg(&'static str),

    /// The page already holds `max_keys` entries. Split, then retry.
    #[error("page is full")]
    NodeFull,

    /// Deleting would drop the page below `min_keys`. Redistribute or
    /// concatenate with a sibling, then retry.
    #[error("page would underflow")]
    Underflow,

    /// The key is already present in the page.
    #[error("attempt to insert duplicate key")]
    DuplicateInsert,

    /// The key is not present in the page.
    #[error("key not found")]
    KeyNotFound,

    /// The requested geometry cannot describe a usable page.
    #[error("unusable index geometry: {0}")]
    Config(String),
}

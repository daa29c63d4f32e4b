//! Error types for the crate's few fallible, non-panicking entry points.
//!
//! Most of the public surface reports "absent" outcomes through `Option`
//! rather than `Result` — a missing key is routine, not an error. The
//! handful of cases that really are programmer mistakes (a bad branching
//! factor) get a real `Result` escape hatch here so a caller that derives
//! its degree from untrusted input doesn't have to `catch_unwind`.

use thiserror::Error;

/// Errors surfaced by the non-panicking constructors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BTreeError {
    /// The requested branching factor is too small to form a valid tree.
    #[error("branching factor must be >= 2, got {degree}")]
    DegreeTooSmall { degree: usize },
}

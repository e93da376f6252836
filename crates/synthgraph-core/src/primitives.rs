//! # Engine Limits and Format Constants
//!
//! Fixed runtime constants for the synthesis engine. These are compiled into
//! the binary and immutable at runtime.
//!
//! Every capacity limit is enforced explicitly: reaching one returns
//! `SynthError::CapacityExceeded`, nothing is silently truncated.

/// Maximum number of live items (nodes) in one graph.
pub const MAX_NODES: usize = 100_000;

/// Maximum number of recipes (edges) in one graph.
pub const MAX_EDGES: usize = 1_000_000;

/// Maximum number of predicates held in an inventory.
pub const MAX_INVENTORY: usize = 10_000;

/// Maximum length in bytes of an item label or predicate name.
pub const MAX_LABEL_LENGTH: usize = 128;

// =============================================================================
// SNAPSHOT FORMAT
// =============================================================================

/// Magic bytes for the session snapshot header.
pub const MAGIC_BYTES: &[u8; 4] = b"SYNG";

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the snapshot payload.
pub const FORMAT_VERSION: u8 = 1;

/// Maximum accepted snapshot size (64 MB), checked before decoding.
pub const MAX_SNAPSHOT_SIZE: usize = 64 * 1024 * 1024;

/// Check an item label or predicate name.
///
/// Accepted names are non-empty, contain no whitespace, and fit in
/// `MAX_LABEL_LENGTH` bytes.
#[must_use]
pub fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LENGTH
        && !label.chars().any(char::is_whitespace)
}

/// Check a predicate name: a valid label that contains neither condition
/// operator, so that a condition atom can name it.
#[must_use]
pub fn is_valid_predicate(name: &str) -> bool {
    is_valid_label(name) && !name.contains(['&', '|'])
}

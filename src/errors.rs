//! Error types for caller contract violations detected before resolution
use thiserror::Error;

/// A malformed change set supplied by the caller.
///
/// These are precondition failures in the programming-error class:
/// resolution is all-or-nothing, nothing is partially applied, and retrying
/// with the same input can never succeed.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ChangesError {
    #[error("identifier {identifier} appears more than once as a {kind} record")]
    DuplicateRecord {
        identifier: String,
        kind: &'static str,
    },

    #[error("identifier {identifier} appears as both a {first} and a {second} record")]
    ConflictingRecords {
        identifier: String,
        first: &'static str,
        second: &'static str,
    },
}

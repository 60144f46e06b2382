// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for the combined-object runtime.

/// Errors returned by combined-object operations.
///
/// Navigation errors (`NoSuchField`, `NoSuchCollection`) surface typos in
/// deeply nested paths loudly instead of silently resolving to nothing.
#[derive(Debug)]
pub enum Error {
    // ========================================================================
    // Navigation Errors
    // ========================================================================
    /// No overlay, collection, or base attribute resolves the requested name.
    NoSuchField(String),
    /// A named collection was requested but no bag entry exists for it.
    NoSuchCollection(String),
    /// A field write targeted a value that is not a struct.
    NotAStruct(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Zero or more than one generalization field found and no explicit
    /// target path was given.
    AmbiguousSpecialization(String),
    /// `ensure_collection_at` hit an existing bag entry of the other kind.
    CollectionKindMismatch(String),
    /// Invalid state for the requested operation.
    InvalidState(String),

    // ========================================================================
    // Transport Boundary Errors
    // ========================================================================
    /// Installing a listener on a raw reader/writer failed.
    ListenerInstallFailed(String),
    /// The underlying top-level writer rejected a publication.
    WriteFailed(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Navigation
            Error::NoSuchField(msg) => write!(f, "No such field: {}", msg),
            Error::NoSuchCollection(msg) => write!(f, "No such collection: {}", msg),
            Error::NotAStruct(msg) => write!(f, "Not a struct: {}", msg),
            // Configuration
            Error::AmbiguousSpecialization(msg) => {
                write!(f, "Ambiguous specialization target: {}", msg)
            }
            Error::CollectionKindMismatch(msg) => {
                write!(f, "Collection kind mismatch: {}", msg)
            }
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            // Transport boundary
            Error::ListenerInstallFailed(msg) => write!(f, "Listener install failed: {}", msg),
            Error::WriteFailed(msg) => write!(f, "Write failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Convenient alias for API results using the public `Error` type.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let err = Error::NoSuchField("speed at contacts".to_string());
        assert!(err.to_string().contains("speed at contacts"));

        let err = Error::CollectionKindMismatch("waypoints".to_string());
        assert!(err.to_string().contains("waypoints"));
    }
}

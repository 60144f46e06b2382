// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Element identifier (GUID) implementation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque 16-byte element identifier.
///
/// Used as the stable addressing key for set/list collection elements and as
/// the instance key for assembled combined samples. Equality and hashing are
/// byte-wise; the canonical nil value is all zeros.
///
/// # Display Format
/// Hex with dots: "01.0f.ac.10.00.00.00.00.00.00.00.01.00.00.01.c1"
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Guid([u8; 16]);

impl Guid {
    /// Create a GUID from raw bytes (16 bytes total).
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Convert GUID to a 16-byte array.
    pub fn as_bytes(&self) -> [u8; 16] {
        self.0
    }

    /// Canonical nil value (all zeros).
    pub fn nil() -> Self {
        Self([0; 16])
    }

    /// Check if this GUID is nil.
    pub fn is_nil(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Generate a fresh, non-nil GUID.
    ///
    /// Built from the system clock, the process id, and a process-global
    /// counter. Uniqueness within a process is guaranteed by the counter;
    /// across processes by clock + pid.
    pub fn generate() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        static COUNTER: AtomicU64 = AtomicU64::new(1);

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        let count = COUNTER.fetch_add(1, Ordering::Relaxed);
        let mixed = count
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .wrapping_add(u64::from(std::process::id()));

        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&nanos.to_be_bytes());
        bytes[8..16].copy_from_slice(&mixed.to_be_bytes());

        // Counter starts at 1, so this only trips on pathological clock+mix
        // collisions; nil must never escape the generator.
        if bytes.iter().all(|&b| b == 0) {
            bytes[15] = 1;
        }
        Self(bytes)
    }
}

impl Default for Guid {
    fn default() -> Self {
        Self::nil()
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "01.0f.ac.10.00.00.00.00.00.00.00.01.00.00.01.c1"
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nil_roundtrip() {
        let guid = Guid::nil();
        assert!(guid.is_nil());
        assert_eq!(guid, Guid::default());

        let non_nil = Guid::from_bytes([1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert!(!non_nil.is_nil());
    }

    #[test]
    fn from_bytes_preserves_content() {
        let orig = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];
        let guid = Guid::from_bytes(orig);
        assert_eq!(guid.as_bytes(), orig);
    }

    #[test]
    fn generated_guids_are_fresh_and_distinct() {
        let g1 = Guid::generate();
        let g2 = Guid::generate();
        assert!(!g1.is_nil());
        assert!(!g2.is_nil());
        assert_ne!(g1, g2);
    }

    #[test]
    fn display_is_dotted_hex() {
        let guid = Guid::from_bytes([1, 15, 172, 16, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 193]);
        assert_eq!(
            guid.to_string(),
            "01.0f.ac.10.00.00.00.00.00.00.00.01.00.00.01.c1"
        );
    }

    #[test]
    fn equality_is_bytewise() {
        let bytes = [7u8; 16];
        assert_eq!(Guid::from_bytes(bytes), Guid::from_bytes(bytes));
        let mut other = bytes;
        other[15] = 8;
        assert_ne!(Guid::from_bytes(bytes), Guid::from_bytes(other));
    }
}

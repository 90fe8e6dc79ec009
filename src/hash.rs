//! Deterministic hashing for seed derivation.
//!
//! A seeded [`BuilderSettings`](crate::BuilderSettings) is shared by builds of
//! many fixture types. Each build derives its own session seed from the base seed,
//! the fixture type name and the list size, so two different fixture types do not
//! draw the same positions while every build stays reproducible from run to run.
//! `std`'s `DefaultHasher` is randomly keyed per process and cannot be used here.
//!
//! ```
//! use fixture_forge::hash::derive_seed;
//!
//! let a = derive_seed(7, "app::User", 40);
//! assert_eq!(a, derive_seed(7, "app::User", 40));
//! assert_ne!(a, derive_seed(7, "app::Order", 40));
//! ```
//!
//! FNV-1a is used; it is not cryptographically secure.

use std::hash::{Hash, Hasher};

/// FNV-1a 64-bit offset basis.
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a 64-bit prime.
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// A [`Hasher`] implementing FNV-1a with a fixed basis.
#[derive(Debug, Clone)]
pub struct DeterministicHasher {
    state: u64,
}

impl DeterministicHasher {
    /// Creates a hasher at the FNV-1a offset basis.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
        }
    }
}

impl Default for DeterministicHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for DeterministicHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= u64::from(byte);
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }
}

/// Derives the session seed of one build from a base seed.
#[must_use]
pub fn derive_seed(base_seed: u64, type_name: &str, capacity: usize) -> u64 {
    let mut hasher = DeterministicHasher::new();
    base_seed.hash(&mut hasher);
    type_name.hash(&mut hasher);
    capacity.hash(&mut hasher);
    hasher.finish()
}

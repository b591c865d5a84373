//! Row hashers.
//!
//! Each table row owns one [`RowHasher`] which folds the canonical bytes of an item
//! into a column index in `[0, modulus)`. Hashers differ only by their seed, so a
//! family of row hashers with independently drawn seeds behaves like a family of
//! independent hash functions.
//!
//! The folding itself is done by a [`Mixer`]:
//! - [`Horner`]: polynomial rolling hash, `acc = (acc * seed + byte) mod modulus`.
//!   Every step is reduced, so the result is always in range.
//! - [`Djb2`]: `acc = (acc * 33) ^ byte` starting from 5381, scaled by seed at the end.
//! - [`Wy`]: `wyhash` keyed with the seed, reduced by modulus.
//!
//! All mixers fold UTF-8 bytes. A non-ASCII character therefore takes one Horner
//! step per encoded byte, not one per UTF-16 code unit, and hashes differently from
//! a UTF-16 based fold. ASCII items hash the same under both.

use std::fmt::{Debug, Formatter};

use enum_dispatch::enum_dispatch;
use wyhash::wyhash;

use crate::canonical::Canonicalize;
use crate::error::{Error, Result};

/// Folding of canonical bytes and a seed into `[0, modulus)`
#[enum_dispatch]
pub trait Mix {
    /// Mix `bytes` with `seed`, returning value in `[0, modulus)`. `modulus` is never zero.
    fn mix(&self, seed: u64, modulus: u64, bytes: &[u8]) -> u64;
}

/// Polynomial rolling hash evaluated with Horner's method
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Horner;

impl Mix for Horner {
    #[inline]
    fn mix(&self, seed: u64, modulus: u64, bytes: &[u8]) -> u64 {
        let seed = u128::from(seed);
        let modulus = u128::from(modulus);
        let acc = bytes
            .iter()
            .fold(0u128, |acc, &b| (acc * seed + u128::from(b)) % modulus);
        acc as u64
    }
}

/// Bernstein's djb2 string hash
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Djb2;

impl Mix for Djb2 {
    #[inline]
    fn mix(&self, seed: u64, modulus: u64, bytes: &[u8]) -> u64 {
        let acc = bytes
            .iter()
            .fold(5381u64, |acc, &b| acc.wrapping_mul(33) ^ u64::from(b));
        acc.wrapping_mul(seed) % modulus
    }
}

/// `wyhash` keyed with the row seed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wy;

impl Mix for Wy {
    #[inline]
    fn mix(&self, seed: u64, modulus: u64, bytes: &[u8]) -> u64 {
        wyhash(bytes, seed) % modulus
    }
}

/// Mixing functions available to row hashers
#[enum_dispatch(Mix)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mixer {
    Horner,
    Djb2,
    Wy,
}

impl Default for Mixer {
    fn default() -> Self {
        Mixer::Horner(Horner)
    }
}

/// Seeded hash function projecting items into `[0, modulus)`
#[derive(Clone, PartialEq, Eq)]
pub struct RowHasher {
    seed: u64,
    modulus: usize,
    mixer: Mixer,
}

impl RowHasher {
    /// Create new row hasher using Horner's method
    pub fn new(seed: u64, modulus: usize) -> Result<Self> {
        Self::with_mixer(seed, modulus, Mixer::default())
    }

    /// Create new row hasher using given mixing function
    pub fn with_mixer(seed: u64, modulus: usize, mixer: Mixer) -> Result<Self> {
        if modulus == 0 {
            return Err(Error::invalid_parameter(
                "modulus",
                modulus,
                "a positive table width",
            ));
        }
        Ok(Self {
            seed,
            modulus,
            mixer,
        })
    }

    /// Return seed of this hasher
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Return modulus (table width) of this hasher
    pub fn modulus(&self) -> usize {
        self.modulus
    }

    /// Return mixing function of this hasher
    pub fn mixer(&self) -> Mixer {
        self.mixer
    }

    /// Hash an item into `[0, modulus)`
    #[inline]
    pub fn hash<T: Canonicalize + ?Sized>(&self, item: &T) -> usize {
        self.hash_bytes(&item.to_canonical())
    }

    /// Hash already canonical bytes into `[0, modulus)`
    #[inline]
    pub fn hash_bytes(&self, bytes: &[u8]) -> usize {
        self.mixer.mix(self.seed, self.modulus as u64, bytes) as usize
    }

    /// Hash an item with djb2 regardless of configured mixer
    pub fn djb2_hash<T: Canonicalize + ?Sized>(&self, item: &T) -> usize {
        Djb2.mix(self.seed, self.modulus as u64, &item.to_canonical()) as usize
    }
}

impl Debug for RowHasher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ seed: {}, modulus: {}, mixer: {:?} }}",
            self.seed, self.modulus, self.mixer
        )
    }
}

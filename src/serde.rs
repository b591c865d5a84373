//! # Serde canonicalization
//!
//! Items that already implement `serde::Serialize` can be counted without a hand-written
//! [`Canonicalize`] implementation: [`Serialized`] encodes them to JSON once, and the JSON
//! bytes become their canonical form.
//!
//! Struct fields are serialized in declaration order, so two equal values of a derived
//! `Serialize` type always produce equal bytes. Maps with non-deterministic iteration
//! order (such as `HashMap`) do not have that property and should be converted into an
//! ordered map first.
//!
//! Floats are written the way [`Canonicalize`] writes them (`25.0` as `25`, never in
//! exponent notation), so a `Serialized` value and a hand-written [`Record`] of the same
//! struct produce identical bytes.
//!
//! [`Record`]: crate::canonical::Record
//!
//! Encoding can fail (for example for maps with non-string keys), which is why
//! [`Serialized::new`] returns a `Result`; once constructed, adding and estimating never
//! fail.
use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

use crate::canonical::Canonicalize;
use crate::error::{Error, Result};

/// Compact JSON formatter writing floats in canonical decimal form
struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    // non-finite values never reach here, serde_json writes them as `null`
    fn write_f32<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f32) -> io::Result<()> {
        writer.write_all(value.to_string().as_bytes())
    }

    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        writer.write_all(value.to_string().as_bytes())
    }
}

/// Item canonicalized through its `serde::Serialize` implementation
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Serialized(Vec<u8>);

impl Serialized {
    /// Encode `item` into its canonical JSON form
    pub fn new<T: Serialize + ?Sized>(item: &T) -> Result<Self> {
        let mut out = Vec::new();
        item.serialize(&mut Serializer::with_formatter(&mut out, CanonicalFormatter))
            .map_err(|e| Error::Canonicalization(Box::new(e)))?;
        Ok(Self(out))
    }

    /// Return canonical JSON bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Canonicalize for Serialized {
    fn canonicalize(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0);
    }
}

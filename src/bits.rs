//! Sub-byte field primitives.
//!
//! [`Bits`] narrows an integer to a fixed number of wire bits; [`Spare`] reserves
//! zero bits. Both widths are const parameters, checked when the type is used: a width
//! of zero or one wider than the carrier fails to compile.
//!
//! ```rust
//! use bitform::{Bits, ByteOrder, Decode, Encode, Spare};
//!
//! #[derive(Debug, Default, PartialEq, Encode, Decode)]
//! struct Flags {
//!     reserved: Spare<4>,
//!     a: Bits<u8, 2>,
//!     b: Bits<u8, 2>,
//! }
//!
//! let flags = Flags { reserved: Spare, a: Bits::new(1), b: Bits::new(2) };
//! assert_eq!(bitform::serialize_with(&flags, ByteOrder::LsbFirst)?, [0b1001_0000]);
//! assert_eq!(bitform::serialize_with(&flags, ByteOrder::MsbFirst)?, [0b0000_0110]);
//! # Ok::<(), bitform::BitformError>(())
//! ```

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::error::Result;
use crate::format::{Integer, WORD_BITS};
use crate::policy::{Decode, Encode, Strategy};
use crate::reader::Deserializer;
use crate::writer::Serializer;

/// An integer transmitted as exactly `W` bits.
///
/// Only the low `W` bits reach the wire; higher bits of the held value are silently
/// dropped, and assignment does not range-check. Signed carriers sign-extend on read,
/// so `Bits<i8, 4>` round-trips `-8..=7`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bits<T, const W: u32>(T);

impl<T: Integer, const W: u32> Bits<T, W> {
    /// Number of wire bits.
    pub const WIDTH: u32 = W;

    /// Wraps `value`.
    pub fn new(value: T) -> Self {
        const { assert!(W > 0 && W <= T::BITS, "Bits width must be within 1..=T::BITS") };
        Self(value)
    }

    /// The held value.
    pub fn get(self) -> T {
        self.0
    }

    /// Replaces the held value.
    pub fn set(&mut self, value: T) {
        self.0 = value;
    }
}

impl<T, const W: u32> Deref for Bits<T, W> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T, const W: u32> DerefMut for Bits<T, W> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: Integer, const W: u32> From<T> for Bits<T, W> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Display, const W: u32> fmt::Display for Bits<T, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: Integer, const W: u32> Encode for Bits<T, W> {
    const STRATEGY: Strategy = Strategy::BitField;

    fn encode<S: Serializer>(&self, ser: &mut S) -> Result<()> {
        const { assert!(W > 0 && W <= T::BITS, "Bits width must be within 1..=T::BITS") };
        ser.give(self.0, W)
    }
}

impl<T: Integer, const W: u32> Decode for Bits<T, W> {
    const STRATEGY: Strategy = Strategy::BitField;

    fn decode<D: Deserializer>(&mut self, de: &mut D) -> Result<()> {
        const { assert!(W > 0 && W <= T::BITS, "Bits width must be within 1..=T::BITS") };
        self.0 = de.take(W)?;
        Ok(())
    }
}

/// `W` reserved bits: always written as zero, read and discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Spare<const W: u32>;

impl<const W: u32> Spare<W> {
    /// Number of wire bits.
    pub const WIDTH: u32 = W;
}

impl<const W: u32> Encode for Spare<W> {
    const STRATEGY: Strategy = Strategy::Spare;

    fn encode<S: Serializer>(&self, ser: &mut S) -> Result<()> {
        const { assert!(W > 0 && W <= WORD_BITS, "Spare width must be within 1..=64") };
        ser.write_bits(0, W)
    }
}

impl<const W: u32> Decode for Spare<W> {
    const STRATEGY: Strategy = Strategy::Spare;

    fn decode<D: Deserializer>(&mut self, de: &mut D) -> Result<()> {
        const { assert!(W > 0 && W <= WORD_BITS, "Spare width must be within 1..=64") };
        de.read_bits(W, false)?;
        Ok(())
    }
}

//! Policy resolution: how a type reaches the bit stream.
//!
//! Every serializable type resolves to exactly one *policy*, the pair of an [`Encode`]
//! and a [`Decode`] implementation. The trait system guarantees there is never more
//! than one candidate, and a type with none is rejected at compile time.
//!
//! Policies fall into a fixed set of strategies, listed in [`Strategy`] in the order
//! they take precedence:
//!
//! 1. **Custom**: hand-written `Encode`/`Decode` impls.
//! 2. **Integer**: `u8`..`u64`, `i8`..`i64`, `usize`, `isize`, `bool`.
//! 3. **Enumeration**: `#[derive(Encode, Decode)]` on a fieldless `#[repr(int)]` enum.
//! 4. **Float**: `f32`, `f64`, as the same-width unsigned bit pattern.
//! 5. **Collection**: `Vec`, `VecDeque`, `String`, slices and `str`, with a 64-bit count.
//! 6. **Fixed collection**: `[T; N]`, elements only.
//! 7. **Composite**: `#[derive(Encode, Decode)]` on a struct, fields in declaration order.
//!
//! Bit fields and reserved bits ([`Bits`](crate::Bits), [`Spare`](crate::Spare)) are
//! primitives of their own.
//!
//! A custom type that implements only one direction can still be serialized but not
//! deserialized (or the reverse); the missing direction is a compile error at the call
//! site. [`assert_codec`] moves that check to the type definition.

use crate::error::Result;
use crate::reader::Deserializer;
use crate::writer::Serializer;

/// The rule a type's policy was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Hand-written implementation.
    Custom,
    /// Primitive integer at its natural width.
    Integer,
    /// Enumeration carried as its `repr` integer.
    Enumeration,
    /// Floating point carried as its bit pattern.
    Float,
    /// Resizable collection with a length prefix.
    Collection,
    /// Fixed-size collection without a length prefix.
    FixedCollection,
    /// Plain-data composite, field by field.
    Composite,
    /// Integer restricted to a fixed number of bits.
    BitField,
    /// Reserved zero bits.
    Spare,
}

/// Write half of a policy.
#[diagnostic::on_unimplemented(
    message = "no serialization policy resolves for `{Self}`",
    label = "`{Self}` does not implement `Encode`",
    note = "derive `Encode` for plain-data structs and `#[repr(int)]` enums, or implement it by hand"
)]
pub trait Encode {
    /// Rule this implementation belongs to.
    const STRATEGY: Strategy = Strategy::Custom;

    /// Writes `self` to the serializer.
    fn encode<S: Serializer>(&self, ser: &mut S) -> Result<()>;
}

/// Read half of a policy.
///
/// Decoding writes into an existing value, which lets collections reuse their storage
/// and lets skipped fields keep their current contents.
#[diagnostic::on_unimplemented(
    message = "no deserialization policy resolves for `{Self}`",
    label = "`{Self}` does not implement `Decode`",
    note = "derive `Decode` for plain-data structs and `#[repr(int)]` enums, or implement it by hand"
)]
pub trait Decode {
    /// Rule this implementation belongs to.
    const STRATEGY: Strategy = Strategy::Custom;

    /// Overwrites `self` with a value read from the deserializer.
    fn decode<D: Deserializer>(&mut self, de: &mut D) -> Result<()>;
}

/// A type with both halves of a policy.
pub trait Codec: Encode + Decode {}

impl<T: Encode + Decode + ?Sized> Codec for T {}

/// Compile-time check that `T` has both halves of a policy.
///
/// ```rust
/// use bitform::{assert_codec, Decode, Deserializer, Encode, Serializer};
///
/// struct Celsius(i16);
///
/// impl Encode for Celsius {
///     fn encode<S: Serializer>(&self, ser: &mut S) -> bitform::Result<()> {
///         ser.give(self.0, 12)
///     }
/// }
///
/// impl Decode for Celsius {
///     fn decode<D: Deserializer>(&mut self, de: &mut D) -> bitform::Result<()> {
///         self.0 = de.take(12)?;
///         Ok(())
///     }
/// }
///
/// const _: () = assert_codec::<Celsius>();
/// ```
///
/// Removing either impl above turns the `const` item into a compile error. The same
/// holds for derived types, since `#[derive(Encode)]` and `#[derive(Decode)]` expand
/// independently:
///
/// ```compile_fail
/// use bitform::{assert_codec, Encode};
///
/// #[derive(Encode)]
/// struct WriteOnly {
///     value: u8,
/// }
///
/// const _: () = assert_codec::<WriteOnly>();
/// ```
pub const fn assert_codec<T: Codec + ?Sized>() {}

/// Strategy `T` encodes with.
pub const fn encode_strategy<T: Encode + ?Sized>() -> Strategy {
    T::STRATEGY
}

/// Strategy `T` decodes with.
pub const fn decode_strategy<T: Decode + ?Sized>() -> Strategy {
    T::STRATEGY
}

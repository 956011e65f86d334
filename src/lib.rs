//! # Bitform
//!
//! Bit-exact binary serialization for plain-data Rust types.
//!
//! ## Overview
//!
//! Bitform writes values onto a continuous bit stream. Integers take exactly as many
//! bits as their type (or as many as a [`Bits`] field asks for), sub-byte fields pack
//! back to back across byte boundaries, and only the very last byte of a stream is
//! ever padded. The same value can be laid out most-significant-bit first (big-endian
//! bytes) or least-significant-bit first (little-endian bytes), chosen per call.
//!
//! ### Key Features
//!
//! *   **Derived layouts:** `#[derive(Encode, Decode)]` serializes a struct field by
//!     field in declaration order, and a fieldless `#[repr(u8)]`-style enum as its
//!     discriminant.
//! *   **Sub-byte fields:** [`Bits<T, W>`](Bits) carries the low `W` bits of an integer;
//!     [`Spare<W>`](Spare) reserves `W` zero bits.
//! *   **Collections:** `Vec`, `VecDeque`, `String`, slices and `str` carry a 64-bit
//!     element count; fixed arrays carry only their elements.
//! *   **Compile-time policy resolution:** every type resolves to one [`Encode`] and one
//!     [`Decode`] implementation. Unsupported types, impossible bit widths and
//!     half-implemented custom codecs are rejected by the compiler.
//! *   **Layout reflection:** `#[derive(Reflect)]` reports field count and in-memory
//!     offsets for checking a type against a C definition.
//!
//! ## Wire Format
//!
//! ```text
//! integer        its BITS (or W for Bits<T, W>) bits, two's complement
//! bool           8 bits, 0 or 1 (any non-zero reads as true)
//! f32 / f64      the IEEE-754 bit pattern as u32 / u64
//! enum           its repr integer
//! Vec<T>, ...    u64 element count, then each element
//! [T; N]         each element
//! struct         each non-skipped field in declaration order
//! ```
//!
//! ## Usage Patterns
//!
//! ### Basic Serialization
//!
//! ```rust
//! use bitform::{ByteOrder, Decode, Encode};
//!
//! #[derive(Debug, Default, PartialEq, Encode, Decode)]
//! struct Trio {
//!     a: u8,
//!     b: u16,
//!     c: u8,
//!     flag: bool,
//! }
//!
//! let trio = Trio { a: 0x12, b: 0x3456, c: 0x78, flag: true };
//! let bytes = bitform::serialize(&trio)?;
//! assert_eq!(bytes, [0x12, 0x34, 0x56, 0x78, 0x01]);
//!
//! let back: Trio = bitform::deserialize(&bytes)?;
//! assert_eq!(back, trio);
//!
//! let lsb = bitform::serialize_with(&trio, ByteOrder::LsbFirst)?;
//! assert_eq!(lsb, [0x12, 0x56, 0x34, 0x78, 0x01]);
//! # Ok::<(), bitform::BitformError>(())
//! ```
//!
//! ### Configured Serialization
//!
//! ```rust
//! use bitform::{Bitform, ByteOrder};
//!
//! let options = Bitform::builder()
//!     .byte_order(ByteOrder::LsbFirst)
//!     .align_to(8)
//!     .reject_trailing(true);
//!
//! let bytes = options.serialize(&vec![1u16, 2, 3])?;
//! assert_eq!(bytes.len(), 16);
//! # Ok::<(), bitform::BitformError>(())
//! ```
//!
//! ### Safety and Error Handling
//!
//! * **No Unsafe:** the crate forbids `unsafe` code.
//! * **No Panics:** no `unwrap()` or `panic!()` in the library (enforced by clippy lints).
//! * **Comprehensive Errors:** every runtime failure is a [`BitformError`]. Decoding
//!   never reads past the end of its input.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

// Derived code names `bitform::...`; this lets it resolve inside the crate too.
extern crate self as bitform;

// --- PUBLIC API MODULES ---
pub mod api;
pub mod bits;
pub mod error;
pub mod format;
pub mod io;
pub mod layout;
pub mod policy;
pub mod reader;
pub mod writer;

// Private modules
mod policy_impls;

// --- MACRO SUPPORT MODULES ---

/// Runtime utilities used by the derived code.
#[doc(hidden)]
pub mod rt;

// --- RE-EXPORTS ---

pub use api::{
    align, aligned, deserialize, deserialize_into, deserialize_into_with, deserialize_with,
    serialize, serialize_with, Bitform, BitformOptions,
};
pub use bits::{Bits, Spare};
pub use error::{BitformError, Result};
pub use format::{ByteOrder, Integer, MAX_ZERO_WIDTH_RUN, WORD_BITS};
pub use io::{ByteSink, ByteSource, IoSink, IoSource, SliceSource};
pub use layout::{Field, Layout, Reflect};
pub use policy::{assert_codec, decode_strategy, encode_strategy, Codec, Decode, Encode, Strategy};
pub use reader::{BitReader, Deserializer};
pub use writer::{BitWriter, Serializer};

// Re-export the derive macros so they are accessible as `bitform::Encode` etc.
pub use bitform_derive::{Decode, Encode, Reflect};

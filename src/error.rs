//! Centralized error handling for bitform.
//!
//! Every runtime failure of the codec is reported through [`BitformError`]; the library
//! never panics on malformed input. Errors surface immediately to the caller of the
//! active `serialize`/`deserialize` call: there is no partial-result recovery.
//!
//! Problems that are properties of a *type* rather than of the data (a type with no
//! serialization policy, a one-sided custom implementation, an over-wide [`Bits`] or
//! [`Spare`]) are rejected at compile time and never reach this enum.
//!
//! ## Error Categories
//!
//! - **Bit widths** ([`BitformError::InvalidBitCount`]): a read or write asked for zero
//!   bits or more bits than the integer type (or the 64-bit word) holds.
//! - **Input exhaustion** ([`BitformError::UnexpectedEof`]): a read ran past the input.
//! - **Invalid payloads** ([`BitformError::InvalidDiscriminant`],
//!   [`BitformError::InvalidUtf8`], [`BitformError::LengthOverflow`],
//!   [`BitformError::TrailingBytes`]): the bytes decode to something the target type
//!   cannot hold.
//! - **I/O** ([`BitformError::Io`]): failures of a `std::io` sink or source.
//!
//! ## Usage
//!
//! ```rust
//! use bitform::BitformError;
//!
//! let err = bitform::deserialize::<u32>(&[0x12, 0x34]).unwrap_err();
//! assert!(matches!(err, BitformError::UnexpectedEof { offset: 2 }));
//! ```
//!
//! [`Bits`]: crate::bits::Bits
//! [`Spare`]: crate::bits::Spare

use std::fmt;
use std::io;
use std::sync::Arc;

/// A specialized `Result` type for bitform operations.
pub type Result<T> = std::result::Result<T, BitformError>;

/// The error enum covering every runtime failure of the codec.
///
/// The type is `Clone`; I/O errors are wrapped in an `Arc` for that purpose.
#[derive(Debug, Clone)]
pub enum BitformError {
    /// A bit-level read or write requested an unsupported width.
    ///
    /// `requested` is the width that was asked for, `max` the largest width allowed by
    /// the integer type involved (or 64 for raw word access). A width of zero is always
    /// rejected.
    InvalidBitCount {
        /// Number of bits requested.
        requested: u32,
        /// Largest number of bits the operation supports.
        max: u32,
    },

    /// The input ended before the value was complete.
    ///
    /// `offset` is the zero-based index of the byte that could not be read. A reader
    /// that returned this error is left mid-value and must not be reused.
    UnexpectedEof {
        /// Index of the missing byte.
        offset: u64,
    },

    /// A decoded enumeration value matches none of the enum's variants.
    InvalidDiscriminant {
        /// Fully qualified name of the enum.
        type_name: &'static str,
        /// The raw bits that were read, zero- or sign-extended to 64 bits.
        raw: u64,
    },

    /// A decoded `String` did not contain valid UTF-8.
    InvalidUtf8(String),

    /// A decoded collection length does not fit in `usize` on this platform.
    LengthOverflow(u64),

    /// A decoded collection claims more than
    /// [`MAX_ZERO_WIDTH_RUN`](crate::format::MAX_ZERO_WIDTH_RUN) consecutive elements
    /// that occupy no wire bits. Such a count is not bounded by the input size.
    ZeroWidthOverflow(u64),

    /// `align` was called with an alignment of zero.
    InvalidAlignment,

    /// The input held more bytes than the decoded value consumed, and the options
    /// asked for trailing input to be rejected.
    TrailingBytes {
        /// Number of whole bytes left unread.
        remaining: u64,
    },

    /// Failure of an underlying `std::io` writer or reader.
    Io(Arc<io::Error>),
}

impl fmt::Display for BitformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBitCount { requested, max } => {
                write!(f, "Invalid bit count: requested {requested}, supported 1..={max}")
            }
            Self::UnexpectedEof { offset } => {
                write!(f, "Unexpected end of input: byte {offset} is out of range")
            }
            Self::InvalidDiscriminant { type_name, raw } => {
                write!(f, "Invalid discriminant {raw:#x} for enum {type_name}")
            }
            Self::InvalidUtf8(s) => write!(f, "Invalid UTF-8 in string: {s}"),
            Self::LengthOverflow(len) => {
                write!(f, "Collection length {len} does not fit in usize")
            }
            Self::ZeroWidthOverflow(len) => write!(
                f,
                "Collection length {len} exceeds the limit for elements without wire bits"
            ),
            Self::InvalidAlignment => write!(f, "Alignment must be greater than zero"),
            Self::TrailingBytes { remaining } => {
                write!(f, "{remaining} trailing byte(s) left after decoding")
            }
            Self::Io(e) => write!(f, "I/O Error: {e}"),
        }
    }
}

impl std::error::Error for BitformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for BitformError {
    fn from(err: io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

/// Validates a bit width against `1..=max`.
pub(crate) fn check_bit_count(requested: u32, max: u32) -> Result<()> {
    if requested == 0 || requested > max {
        return Err(BitformError::InvalidBitCount { requested, max });
    }
    Ok(())
}

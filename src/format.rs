//! Wire-level vocabulary: byte order and the integer primitives the bit stream carries.
//!
//! Everything that reaches the wire is ultimately an [`Integer`] written with a given
//! number of bits. Floats, enumerations, collection lengths, bit fields and padding are
//! all lowered to integers by their policies before touching the stream.

/// Width in bits of the word the bit stream moves in one call.
///
/// This is the "native integer width" of the codec: no single read or write may
/// exceed it, and collection lengths are transmitted with exactly this many bits.
pub const WORD_BITS: u32 = u64::BITS;

/// Longest run of collection elements that may decode without consuming a single bit.
///
/// Elements such as `()` or an empty struct have no wire representation, so their
/// count is the only thing the input carries. Decoding more of them in a row fails
/// with [`BitformError::ZeroWidthOverflow`](crate::BitformError::ZeroWidthOverflow).
pub const MAX_ZERO_WIDTH_RUN: usize = 1 << 16;

/// Order in which the bits of a value are laid onto the byte stream.
///
/// `MsbFirst` emits the most significant requested bit first and fills every byte
/// from bit 7 downwards, so multi-byte integers come out big-endian. `LsbFirst` emits
/// the least significant bit first and fills bytes from bit 0 upwards, so multi-byte
/// integers come out little-endian.
///
/// ```rust
/// use bitform::{ByteOrder, serialize_with};
///
/// assert_eq!(serialize_with(&0x1234_5678u32, ByteOrder::MsbFirst)?, [0x12, 0x34, 0x56, 0x78]);
/// assert_eq!(serialize_with(&0x1234_5678u32, ByteOrder::LsbFirst)?, [0x78, 0x56, 0x34, 0x12]);
/// # Ok::<(), bitform::BitformError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ByteOrder {
    /// Most significant bit first (big-endian byte order).
    #[default]
    MsbFirst,
    /// Least significant bit first (little-endian byte order).
    LsbFirst,
}

/// A primitive integer the bit stream can carry directly.
///
/// `to_raw` produces the two's-complement bit pattern widened to 64 bits; `from_raw`
/// truncates a 64-bit pattern back to the type. Only the low `bits` bits of a raw
/// value are ever written, so sign-extended raws of signed types are fine.
pub trait Integer: Copy + 'static {
    /// Natural width of the type in bits.
    const BITS: u32;
    /// Whether reads into this type sign-extend.
    const SIGNED: bool;

    /// Widens the value to its 64-bit two's-complement pattern.
    fn to_raw(self) -> u64;

    /// Narrows a 64-bit pattern to the type, discarding the high bits.
    fn from_raw(raw: u64) -> Self;
}

macro_rules! impl_integer {
    (unsigned: $($t:ty),*) => {
        $(
            impl Integer for $t {
                const BITS: u32 = <$t>::BITS;
                const SIGNED: bool = false;

                #[inline]
                fn to_raw(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn from_raw(raw: u64) -> Self {
                    raw as $t
                }
            }
        )*
    };
    (signed: $($t:ty),*) => {
        $(
            impl Integer for $t {
                const BITS: u32 = <$t>::BITS;
                const SIGNED: bool = true;

                #[inline]
                fn to_raw(self) -> u64 {
                    self as i64 as u64
                }

                #[inline]
                fn from_raw(raw: u64) -> Self {
                    raw as i64 as $t
                }
            }
        )*
    };
}

impl_integer!(unsigned: u8, u16, u32, u64, usize);
impl_integer!(signed: i8, i16, i32, i64, isize);

/// `bool` travels as an 8-bit integer; any non-zero pattern reads back as `true`.
impl Integer for bool {
    const BITS: u32 = u8::BITS;
    const SIGNED: bool = false;

    #[inline]
    fn to_raw(self) -> u64 {
        u64::from(self)
    }

    #[inline]
    fn from_raw(raw: u64) -> Self {
        raw != 0
    }
}

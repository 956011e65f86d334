//! The read side of the bit stream.
//!
//! [`Deserializer`] is the interface policies decode against; [`BitReader`] pulls bytes
//! from any [`ByteSource`] and hands them out bit by bit.

use crate::error::{check_bit_count, Result};
use crate::format::{ByteOrder, Integer, WORD_BITS};
use crate::io::ByteSource;
use crate::policy::Decode;

/// Bit-level input used by [`Decode`] implementations.
pub trait Deserializer: Sized {
    /// The byte order this deserializer unpacks with.
    fn byte_order(&self) -> ByteOrder;

    /// Reads `bits` bits (`1..=64`) and returns them right-aligned.
    ///
    /// With `sign_extend`, every bit above the `bits`-th copies the most significant
    /// bit read.
    fn read_bits(&mut self, bits: u32, sign_extend: bool) -> Result<u64>;

    /// Bits consumed so far.
    fn bits_read(&self) -> u64;

    /// Reads `bits` bits into an integer, sign-extending when `T` is signed.
    ///
    /// Fails with [`InvalidBitCount`](crate::BitformError::InvalidBitCount) when `bits` is
    /// zero or wider than `T`.
    fn take<T: Integer>(&mut self, bits: u32) -> Result<T> {
        check_bit_count(bits, T::BITS)?;
        let raw = self.read_bits(bits, T::SIGNED)?;
        Ok(T::from_raw(raw))
    }

    /// Decodes into an existing value through its resolved policy.
    fn get<T: Decode + ?Sized>(&mut self, value: &mut T) -> Result<()> {
        value.decode(self)
    }
}

/// Unpacks arbitrary-width values from bytes.
///
/// ```rust
/// use bitform::{BitReader, ByteOrder, Deserializer, SliceSource};
///
/// let data = [0b1011_0000];
/// let mut reader = BitReader::new(SliceSource::new(&data), ByteOrder::MsbFirst);
/// assert_eq!(reader.take::<u8>(3)?, 0b101);
/// assert_eq!(reader.take::<i8>(2)?, -2);
/// # Ok::<(), bitform::BitformError>(())
/// ```
#[derive(Debug)]
pub struct BitReader<S: ByteSource> {
    source: S,
    order: ByteOrder,
    byte: u8,
    remaining: u32,
    bits_read: u64,
}

impl<S: ByteSource> BitReader<S> {
    /// Creates a reader over `source`.
    pub fn new(source: S, order: ByteOrder) -> Self {
        Self {
            source,
            order,
            byte: 0,
            remaining: 0,
            bits_read: 0,
        }
    }

    /// Reads `bits` bits in the reader's byte order.
    pub fn read_bits(&mut self, bits: u32, sign_extend: bool) -> Result<u64> {
        check_bit_count(bits, WORD_BITS)?;

        let mut value = 0u64;
        for i in 0..bits {
            if self.remaining == 0 {
                self.byte = self.source.get_byte()?;
                self.remaining = u8::BITS;
            }
            self.remaining -= 1;

            match self.order {
                ByteOrder::MsbFirst => {
                    let bit = (self.byte >> self.remaining) & 1;
                    value = (value << 1) | u64::from(bit);
                }
                ByteOrder::LsbFirst => {
                    let bit = (self.byte >> (7 - self.remaining)) & 1;
                    value |= u64::from(bit) << i;
                }
            }
            self.bits_read += 1;
        }

        if sign_extend && bits < WORD_BITS && (value >> (bits - 1)) & 1 == 1 {
            value |= u64::MAX << bits;
        }
        Ok(value)
    }

    /// Drops the unread bits of the current byte so the next read starts on a byte
    /// boundary.
    pub fn skip_to_byte(&mut self) {
        self.bits_read += u64::from(self.remaining);
        self.remaining = 0;
    }

    /// `true` when no partially consumed byte is pending.
    pub fn is_aligned(&self) -> bool {
        self.remaining == 0
    }

    /// Bits consumed so far.
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// The underlying source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// The underlying source, mutably.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Hands back the source. Unread bits of a partial byte are lost.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: ByteSource> Deserializer for BitReader<S> {
    fn byte_order(&self) -> ByteOrder {
        self.order
    }

    fn read_bits(&mut self, bits: u32, sign_extend: bool) -> Result<u64> {
        BitReader::read_bits(self, bits, sign_extend)
    }

    fn bits_read(&self) -> u64 {
        self.bits_read
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BitformError;
    use crate::io::SliceSource;

    fn reader(data: &[u8], order: ByteOrder) -> BitReader<SliceSource<'_>> {
        BitReader::new(SliceSource::new(data), order)
    }

    #[test]
    fn test_u32_msb_first() {
        let data = [0x12, 0x34, 0x56, 0x78];
        assert_eq!(reader(&data, ByteOrder::MsbFirst).take::<u32>(32).unwrap(), 0x1234_5678);
    }

    #[test]
    fn test_u32_lsb_first() {
        let data = [0x12, 0x34, 0x56, 0x78];
        assert_eq!(reader(&data, ByteOrder::LsbFirst).take::<u32>(32).unwrap(), 0x7856_3412);
    }

    #[test]
    fn test_int8_negative() {
        let data = [(-5i8) as u8];
        assert_eq!(reader(&data, ByteOrder::MsbFirst).take::<i8>(8).unwrap(), -5);
    }

    #[test]
    fn test_sign_extension_only_when_negative() {
        let data = [0b0111_1000];
        let mut r = reader(&data, ByteOrder::MsbFirst);
        assert_eq!(r.take::<i8>(4).unwrap(), 7);
        assert_eq!(r.take::<i8>(4).unwrap(), -8);
    }

    #[test]
    fn test_lsb_sub_byte_fields() {
        let data = [0b1001_0000];
        let mut r = reader(&data, ByteOrder::LsbFirst);
        assert_eq!(r.read_bits(4, false).unwrap(), 0);
        assert_eq!(r.read_bits(2, false).unwrap(), 1);
        assert_eq!(r.read_bits(2, false).unwrap(), 2);
        assert!(r.is_aligned());
    }

    #[test]
    fn test_skip_to_byte() {
        let data = [0xFF, 0x0F];
        let mut r = reader(&data, ByteOrder::MsbFirst);
        r.read_bits(3, false).unwrap();
        r.skip_to_byte();
        assert_eq!(r.bits_read(), 8);
        assert_eq!(r.read_bits(8, false).unwrap(), 0x0F);
    }

    #[test]
    fn test_reading_past_end_fails() {
        let data = [0xAA];
        let mut r = reader(&data, ByteOrder::MsbFirst);
        assert!(matches!(
            r.take::<u16>(16),
            Err(BitformError::UnexpectedEof { offset: 1 })
        ));
    }

    #[test]
    fn test_rejects_invalid_widths() {
        let data = [0u8; 16];
        let mut r = reader(&data, ByteOrder::MsbFirst);
        assert!(matches!(
            r.read_bits(0, false),
            Err(BitformError::InvalidBitCount { requested: 0, .. })
        ));
        assert!(matches!(
            r.take::<u8>(9),
            Err(BitformError::InvalidBitCount { requested: 9, max: 8 })
        ));
        assert!(matches!(
            r.read_bits(65, false),
            Err(BitformError::InvalidBitCount { requested: 65, max: 64 })
        ));
        assert_eq!(r.bits_read(), 0);
    }

    #[test]
    fn test_full_word_signed() {
        let data = [0xFF; 8];
        assert_eq!(reader(&data, ByteOrder::LsbFirst).take::<i64>(64).unwrap(), -1);
    }
}

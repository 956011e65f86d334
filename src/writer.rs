//! The write side of the bit stream.
//!
//! [`Serializer`] is the interface policies encode against; [`BitWriter`] is the
//! implementation that packs bits into bytes for any [`ByteSink`].

use crate::error::{check_bit_count, Result};
use crate::format::{ByteOrder, Integer, WORD_BITS};
use crate::io::ByteSink;
use crate::policy::Encode;

/// Bit-level output used by [`Encode`] implementations.
///
/// Implementors only provide [`Serializer::write_bits`]; the typed helpers validate
/// widths against the integer type and dispatch to nested policies.
pub trait Serializer: Sized {
    /// The byte order this serializer packs with.
    fn byte_order(&self) -> ByteOrder;

    /// Writes the low `bits` bits of `raw`. `bits` must be in `1..=64`.
    fn write_bits(&mut self, raw: u64, bits: u32) -> Result<()>;

    /// Writes the low `bits` bits of an integer.
    ///
    /// Fails with [`InvalidBitCount`](crate::BitformError::InvalidBitCount) when `bits` is
    /// zero or wider than `T`.
    fn give<T: Integer>(&mut self, value: T, bits: u32) -> Result<()> {
        check_bit_count(bits, T::BITS)?;
        self.write_bits(value.to_raw(), bits)
    }

    /// Encodes a value through its resolved policy.
    fn put<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.encode(self)
    }
}

/// Packs arbitrary-width values into bytes.
///
/// Completed bytes go straight to the sink. A trailing partial byte stays buffered
/// until [`BitWriter::flush`] or [`BitWriter::finish`] pads it with zero bits.
///
/// ```rust
/// use bitform::{BitWriter, ByteOrder, Serializer};
///
/// let mut writer = BitWriter::new(Vec::new(), ByteOrder::MsbFirst);
/// writer.give(0b101u8, 3)?;
/// writer.give(0b1u8, 1)?;
/// assert_eq!(writer.finish()?, [0b1011_0000]);
/// # Ok::<(), bitform::BitformError>(())
/// ```
#[derive(Debug)]
pub struct BitWriter<S: ByteSink> {
    sink: S,
    order: ByteOrder,
    byte: u8,
    filled: u32,
    bits_written: u64,
}

impl<S: ByteSink> BitWriter<S> {
    /// Creates a writer that emits into `sink`.
    pub fn new(sink: S, order: ByteOrder) -> Self {
        Self {
            sink,
            order,
            byte: 0,
            filled: 0,
            bits_written: 0,
        }
    }

    /// Writes the low `bits` bits of `raw` in the writer's byte order.
    pub fn write_bits(&mut self, raw: u64, bits: u32) -> Result<()> {
        check_bit_count(bits, WORD_BITS)?;

        for i in 0..bits {
            let (bit, pos) = match self.order {
                ByteOrder::MsbFirst => ((raw >> (bits - 1 - i)) & 1, 7 - self.filled),
                ByteOrder::LsbFirst => ((raw >> i) & 1, self.filled),
            };
            self.byte |= (bit as u8) << pos;
            self.filled += 1;
            self.bits_written += 1;

            if self.filled == u8::BITS {
                self.sink.put_byte(self.byte)?;
                self.byte = 0;
                self.filled = 0;
            }
        }
        Ok(())
    }

    /// Emits the pending partial byte, zero-padded. No-op when already aligned.
    pub fn flush(&mut self) -> Result<()> {
        if self.filled > 0 {
            self.sink.put_byte(self.byte)?;
            self.bits_written += u64::from(u8::BITS - self.filled);
            self.byte = 0;
            self.filled = 0;
        }
        Ok(())
    }

    /// Flushes and hands back the sink.
    pub fn finish(mut self) -> Result<S> {
        self.flush()?;
        Ok(self.sink)
    }

    /// `true` when no partial byte is pending.
    pub fn is_aligned(&self) -> bool {
        self.filled == 0
    }

    /// Bits accepted so far, including flush padding.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// The sink, without flushing.
    pub fn get_ref(&self) -> &S {
        &self.sink
    }
}

impl<S: ByteSink> Serializer for BitWriter<S> {
    fn byte_order(&self) -> ByteOrder {
        self.order
    }

    fn write_bits(&mut self, raw: u64, bits: u32) -> Result<()> {
        BitWriter::write_bits(self, raw, bits)
    }
}

//! Public entry points.
//!
//! The free functions cover the common cases with the default byte order
//! ([`ByteOrder::MsbFirst`]) or an explicit one. [`Bitform::builder`] returns a
//! [`BitformOptions`] for everything else: output alignment, strict trailing-byte
//! checks, and `std::io` targets.

use std::any::type_name;
use std::io::{Read, Write};

use log::{debug, trace};

use crate::error::{BitformError, Result};
use crate::format::ByteOrder;
use crate::io::{ByteSink, IoSink, IoSource, SliceSource};
use crate::policy::{Decode, Encode};
use crate::reader::{BitReader, Deserializer};
use crate::writer::{BitWriter, Serializer};

/// Serializes `value` most-significant-bit first.
pub fn serialize<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serialize_with(value, ByteOrder::MsbFirst)
}

/// Serializes `value` in the given byte order.
///
/// The final partial byte, if any, is padded with zero bits.
pub fn serialize_with<T: Encode + ?Sized>(value: &T, order: ByteOrder) -> Result<Vec<u8>> {
    let mut writer = BitWriter::new(Vec::new(), order);
    writer.put(value)?;
    let bytes = writer.finish()?;
    trace!(
        "serialized {} ({order:?}): {} bytes",
        type_name::<T>(),
        bytes.len()
    );
    Ok(bytes)
}

/// Deserializes a new `T` from `bytes`, most-significant-bit first.
///
/// Decoding starts from `T::default()`. Trailing input is ignored.
pub fn deserialize<T: Decode + Default>(bytes: &[u8]) -> Result<T> {
    deserialize_with(bytes, ByteOrder::MsbFirst)
}

/// Deserializes a new `T` from `bytes` in the given byte order.
pub fn deserialize_with<T: Decode + Default>(bytes: &[u8], order: ByteOrder) -> Result<T> {
    let mut value = T::default();
    deserialize_into_with(&mut value, bytes, order)?;
    Ok(value)
}

/// Deserializes into an existing value, most-significant-bit first.
pub fn deserialize_into<T: Decode + ?Sized>(value: &mut T, bytes: &[u8]) -> Result<()> {
    deserialize_into_with(value, bytes, ByteOrder::MsbFirst)
}

/// Deserializes into an existing value in the given byte order.
///
/// On error `value` may be partially overwritten.
pub fn deserialize_into_with<T: Decode + ?Sized>(
    value: &mut T,
    bytes: &[u8],
    order: ByteOrder,
) -> Result<()> {
    decode_slice(value, bytes, order).map(|_| ())
}

/// Pads `bytes` in place with zero bytes up to a multiple of `alignment`.
///
/// Already aligned input is left untouched. An alignment of zero is rejected with
/// [`BitformError::InvalidAlignment`].
///
/// ```rust
/// let mut bytes = vec![1u8; 54];
/// bitform::align(&mut bytes, 8)?;
/// assert_eq!(bytes.len(), 56);
/// # Ok::<(), bitform::BitformError>(())
/// ```
pub fn align(bytes: &mut Vec<u8>, alignment: usize) -> Result<()> {
    let padding = padding_for(bytes.len() as u64, alignment)?;
    bytes.resize(bytes.len() + padding, 0);
    Ok(())
}

/// By-value form of [`align`].
pub fn aligned(mut bytes: Vec<u8>, alignment: usize) -> Result<Vec<u8>> {
    align(&mut bytes, alignment)?;
    Ok(bytes)
}

fn padding_for(len: u64, alignment: usize) -> Result<usize> {
    if alignment == 0 {
        return Err(BitformError::InvalidAlignment);
    }
    let rem = (len % alignment as u64) as usize;
    Ok(if rem == 0 { 0 } else { alignment - rem })
}

/// Decodes from a slice and returns how many whole bytes were left unread.
fn decode_slice<T: Decode + ?Sized>(value: &mut T, bytes: &[u8], order: ByteOrder) -> Result<usize> {
    let mut reader = BitReader::new(SliceSource::new(bytes), order);
    reader.get(value)?;
    let remaining = reader.get_ref().remaining();
    trace!(
        "deserialized {} ({order:?}): {} of {} bytes consumed",
        type_name::<T>(),
        bytes.len() - remaining,
        bytes.len()
    );
    Ok(remaining)
}

/// The main entry point for configured serialization.
///
/// ```rust
/// use bitform::{Bitform, ByteOrder};
///
/// let bytes = Bitform::builder()
///     .byte_order(ByteOrder::LsbFirst)
///     .align_to(4)
///     .serialize(&0xABCDu16)?;
/// assert_eq!(bytes, [0xCD, 0xAB, 0, 0]);
/// # Ok::<(), bitform::BitformError>(())
/// ```
#[derive(Debug)]
pub struct Bitform;

impl Bitform {
    /// Starts from the default options.
    pub fn builder() -> BitformOptions {
        BitformOptions::default()
    }

    /// Serializes with default options.
    pub fn serialize<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
        Self::builder().serialize(value)
    }

    /// Deserializes with default options.
    pub fn deserialize<T: Decode + Default>(bytes: &[u8]) -> Result<T> {
        Self::builder().deserialize(bytes)
    }

    /// Serializes to a writer with default options.
    pub fn write<W: Write, T: Encode + ?Sized>(writer: W, value: &T) -> Result<()> {
        Self::builder().write_to(writer, value)
    }

    /// Deserializes from a reader with default options.
    pub fn read<R: Read, T: Decode + Default>(reader: R) -> Result<T> {
        Self::builder().read_from(reader)
    }
}

/// Configuration for a serialize or deserialize call.
///
/// With the `serde` feature enabled the options can be loaded from configuration
/// files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BitformOptions {
    byte_order: ByteOrder,
    alignment: Option<usize>,
    reject_trailing: bool,
}

impl BitformOptions {
    /// Sets the byte order (default: [`ByteOrder::MsbFirst`]).
    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    /// Pads serialized output with zero bytes to a multiple of `alignment`.
    ///
    /// An alignment of zero makes serialization fail with
    /// [`BitformError::InvalidAlignment`].
    pub fn align_to(mut self, alignment: usize) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Rejects input that still holds whole bytes after the value is decoded.
    pub fn reject_trailing(mut self, reject: bool) -> Self {
        self.reject_trailing = reject;
        self
    }

    /// The configured byte order.
    pub fn get_byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Serializes `value` into a new buffer.
    pub fn serialize<T: Encode + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let mut bytes = serialize_with(value, self.byte_order)?;
        if let Some(alignment) = self.alignment {
            align(&mut bytes, alignment)?;
        }
        Ok(bytes)
    }

    /// Deserializes a new `T`.
    pub fn deserialize<T: Decode + Default>(&self, bytes: &[u8]) -> Result<T> {
        let mut value = T::default();
        self.deserialize_into(&mut value, bytes)?;
        Ok(value)
    }

    /// Deserializes into an existing value.
    pub fn deserialize_into<T: Decode + ?Sized>(&self, value: &mut T, bytes: &[u8]) -> Result<()> {
        let remaining = decode_slice(value, bytes, self.byte_order)?;
        self.check_trailing::<T>(remaining as u64)
    }

    /// Serializes `value` to `writer`, then flushes it.
    pub fn write_to<W: Write, T: Encode + ?Sized>(&self, writer: W, value: &T) -> Result<()> {
        let mut writer = BitWriter::new(IoSink::new(writer), self.byte_order);
        writer.put(value)?;
        let mut sink = writer.finish()?;
        if let Some(alignment) = self.alignment {
            for _ in 0..padding_for(sink.bytes_written(), alignment)? {
                sink.put_byte(0)?;
            }
        }
        trace!(
            "wrote {} ({:?}): {} bytes",
            type_name::<T>(),
            self.byte_order,
            sink.bytes_written()
        );
        sink.flush()
    }

    /// Deserializes a new `T` from `reader`.
    ///
    /// With [`BitformOptions::reject_trailing`] set, the rest of the stream is read to
    /// count leftover bytes.
    pub fn read_from<R: Read, T: Decode + Default>(&self, reader: R) -> Result<T> {
        let mut value = T::default();
        let mut reader = BitReader::new(IoSource::new(reader), self.byte_order);
        reader.get(&mut value)?;
        let source = reader.get_mut();
        trace!(
            "read {} ({:?}): {} bytes",
            type_name::<T>(),
            self.byte_order,
            source.bytes_read()
        );
        if self.reject_trailing {
            let remaining = source.drain()?;
            self.check_trailing::<T>(remaining)?;
        }
        Ok(value)
    }

    fn check_trailing<T: ?Sized>(&self, remaining: u64) -> Result<()> {
        if self.reject_trailing && remaining > 0 {
            debug!(
                "rejecting {}: {remaining} trailing byte(s)",
                type_name::<T>()
            );
            return Err(BitformError::TrailingBytes { remaining });
        }
        Ok(())
    }
}

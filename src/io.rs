//! Byte-level sinks and sources underneath the bit stream.
//!
//! The bit stream only needs to push or pull one byte at a time. [`ByteSink`] and
//! [`ByteSource`] capture exactly that, so the same [`BitWriter`]/[`BitReader`] runs
//! over a growable `Vec<u8>`, a borrowed slice, or any `std::io` stream.
//!
//! [`BitWriter`]: crate::writer::BitWriter
//! [`BitReader`]: crate::reader::BitReader

use std::io::{self, BufReader, BufWriter, Read, Write};

use crate::error::{BitformError, Result};

/// Destination of the bytes produced by a [`BitWriter`](crate::writer::BitWriter).
pub trait ByteSink {
    /// Appends one byte.
    fn put_byte(&mut self, byte: u8) -> Result<()>;
}

/// Origin of the bytes consumed by a [`BitReader`](crate::reader::BitReader).
pub trait ByteSource {
    /// Takes the next byte, failing with [`BitformError::UnexpectedEof`] once the input
    /// is exhausted.
    fn get_byte(&mut self) -> Result<u8>;
}

/// The growable in-memory sink. Pushing never fails.
impl ByteSink for Vec<u8> {
    #[inline]
    fn put_byte(&mut self, byte: u8) -> Result<()> {
        self.push(byte);
        Ok(())
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    #[inline]
    fn put_byte(&mut self, byte: u8) -> Result<()> {
        (**self).put_byte(byte)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    #[inline]
    fn get_byte(&mut self) -> Result<u8> {
        (**self).get_byte()
    }
}

/// A bounds-checked read cursor over a borrowed byte slice.
///
/// The slice is never copied; it must outlive the source.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Creates a cursor positioned at the first byte of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Number of bytes handed out so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes not yet handed out.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// The unread tail of the input.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl ByteSource for SliceSource<'_> {
    #[inline]
    fn get_byte(&mut self) -> Result<u8> {
        match self.data.get(self.pos) {
            Some(&byte) => {
                self.pos += 1;
                Ok(byte)
            }
            None => Err(BitformError::UnexpectedEof {
                offset: self.pos as u64,
            }),
        }
    }
}

/// A sink over any [`std::io::Write`], buffered internally.
///
/// Bytes reach the underlying writer when the buffer fills, on [`IoSink::flush`], or on
/// [`IoSink::into_inner`].
#[derive(Debug)]
pub struct IoSink<W: Write> {
    writer: BufWriter<W>,
    written: u64,
}

impl<W: Write> IoSink<W> {
    /// Wraps `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            written: 0,
        }
    }

    /// Total bytes accepted so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Pushes buffered bytes to the underlying writer and flushes it.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| BitformError::from(e.into_error()))
    }
}

impl<W: Write> ByteSink for IoSink<W> {
    #[inline]
    fn put_byte(&mut self, byte: u8) -> Result<()> {
        self.writer.write_all(&[byte])?;
        self.written += 1;
        Ok(())
    }
}

/// A source over any [`std::io::Read`], buffered internally.
///
/// End of stream in the middle of a value is reported as
/// [`BitformError::UnexpectedEof`], not as an I/O error.
#[derive(Debug)]
pub struct IoSource<R: Read> {
    reader: BufReader<R>,
    consumed: u64,
}

impl<R: Read> IoSource<R> {
    /// Wraps `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            consumed: 0,
        }
    }

    /// Total bytes handed out so far.
    pub fn bytes_read(&self) -> u64 {
        self.consumed
    }

    /// Reads and discards the rest of the stream, returning how many bytes it held.
    pub fn drain(&mut self) -> Result<u64> {
        Ok(io::copy(&mut self.reader, &mut io::sink())?)
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    fn get_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        match self.reader.read_exact(&mut buf) {
            Ok(()) => {
                self.consumed += 1;
                Ok(buf[0])
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(BitformError::UnexpectedEof {
                    offset: self.consumed,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

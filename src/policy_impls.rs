//! Built-in policies for standard Rust types.
//!
//! Collections write their element count as a full [`WORD_BITS`]-wide unsigned integer
//! and then each element. On decode the destination is resized to the count: surplus
//! elements are truncated, existing ones are decoded in place, and missing ones are
//! appended from `Default` one at a time, so a corrupt count runs out of input long
//! before it can exhaust memory. Elements that take no wire bits cannot run out of
//! input; at most [`MAX_ZERO_WIDTH_RUN`] of them are appended in a row.

use std::collections::VecDeque;
use std::marker::PhantomData;

use crate::error::{BitformError, Result};
use crate::format::{Integer, MAX_ZERO_WIDTH_RUN, WORD_BITS};
use crate::policy::{Decode, Encode, Strategy};
use crate::reader::Deserializer;
use crate::writer::Serializer;

// --- INTEGERS ---

macro_rules! impl_integer_policy {
    ($($t:ty),*) => {
        $(
            impl Encode for $t {
                const STRATEGY: Strategy = Strategy::Integer;

                #[inline]
                fn encode<S: Serializer>(&self, ser: &mut S) -> Result<()> {
                    ser.give(*self, <$t as Integer>::BITS)
                }
            }

            impl Decode for $t {
                const STRATEGY: Strategy = Strategy::Integer;

                #[inline]
                fn decode<D: Deserializer>(&mut self, de: &mut D) -> Result<()> {
                    *self = de.take(<$t as Integer>::BITS)?;
                    Ok(())
                }
            }
        )*
    };
}

impl_integer_policy!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, bool);

// --- FLOATS ---

macro_rules! impl_float_policy {
    ($($f:ty => $u:ty),*) => {
        $(
            impl Encode for $f {
                const STRATEGY: Strategy = Strategy::Float;

                #[inline]
                fn encode<S: Serializer>(&self, ser: &mut S) -> Result<()> {
                    ser.give(self.to_bits(), <$u>::BITS)
                }
            }

            impl Decode for $f {
                const STRATEGY: Strategy = Strategy::Float;

                #[inline]
                fn decode<D: Deserializer>(&mut self, de: &mut D) -> Result<()> {
                    *self = <$f>::from_bits(de.take::<$u>(<$u>::BITS)?);
                    Ok(())
                }
            }
        )*
    };
}

impl_float_policy!(f32 => u32, f64 => u64);

// --- RESIZABLE COLLECTIONS ---

fn encode_len<S: Serializer>(len: usize, ser: &mut S) -> Result<()> {
    ser.give(len as u64, WORD_BITS)
}

fn decode_len<D: Deserializer>(de: &mut D) -> Result<usize> {
    let raw: u64 = de.take(WORD_BITS)?;
    usize::try_from(raw).map_err(|_| BitformError::LengthOverflow(raw))
}

/// Decodes `missing` new elements from `Default`, handing each to `push`.
fn append_decoded<T, D>(
    de: &mut D,
    len: usize,
    missing: usize,
    mut push: impl FnMut(T),
) -> Result<()>
where
    T: Decode + Default,
    D: Deserializer,
{
    let mut zero_run = 0usize;
    for _ in 0..missing {
        let before = de.bits_read();
        let mut item = T::default();
        de.get(&mut item)?;
        push(item);

        if de.bits_read() == before {
            zero_run += 1;
            if zero_run > MAX_ZERO_WIDTH_RUN {
                return Err(BitformError::ZeroWidthOverflow(len as u64));
            }
        } else {
            zero_run = 0;
        }
    }
    Ok(())
}

impl<T: Encode> Encode for [T] {
    const STRATEGY: Strategy = Strategy::Collection;

    fn encode<S: Serializer>(&self, ser: &mut S) -> Result<()> {
        encode_len(self.len(), ser)?;
        for item in self {
            ser.put(item)?;
        }
        Ok(())
    }
}

impl<T: Encode> Encode for Vec<T> {
    const STRATEGY: Strategy = Strategy::Collection;

    fn encode<S: Serializer>(&self, ser: &mut S) -> Result<()> {
        self.as_slice().encode(ser)
    }
}

impl<T: Decode + Default> Decode for Vec<T> {
    const STRATEGY: Strategy = Strategy::Collection;

    fn decode<D: Deserializer>(&mut self, de: &mut D) -> Result<()> {
        let len = decode_len(de)?;
        self.truncate(len);
        for item in self.iter_mut() {
            de.get(item)?;
        }
        let missing = len - self.len();
        append_decoded(de, len, missing, |item| self.push(item))
    }
}

impl<T: Encode> Encode for VecDeque<T> {
    const STRATEGY: Strategy = Strategy::Collection;

    fn encode<S: Serializer>(&self, ser: &mut S) -> Result<()> {
        encode_len(self.len(), ser)?;
        for item in self {
            ser.put(item)?;
        }
        Ok(())
    }
}

impl<T: Decode + Default> Decode for VecDeque<T> {
    const STRATEGY: Strategy = Strategy::Collection;

    fn decode<D: Deserializer>(&mut self, de: &mut D) -> Result<()> {
        let len = decode_len(de)?;
        self.truncate(len);
        for item in self.iter_mut() {
            de.get(item)?;
        }
        let missing = len - self.len();
        append_decoded(de, len, missing, |item| self.push_back(item))
    }
}

/// Strings count bytes, not characters.
impl Encode for str {
    const STRATEGY: Strategy = Strategy::Collection;

    fn encode<S: Serializer>(&self, ser: &mut S) -> Result<()> {
        self.as_bytes().encode(ser)
    }
}

impl Encode for String {
    const STRATEGY: Strategy = Strategy::Collection;

    fn encode<S: Serializer>(&self, ser: &mut S) -> Result<()> {
        self.as_str().encode(ser)
    }
}

impl Decode for String {
    const STRATEGY: Strategy = Strategy::Collection;

    fn decode<D: Deserializer>(&mut self, de: &mut D) -> Result<()> {
        let mut bytes = std::mem::take(self).into_bytes();
        bytes.decode(de)?;
        *self = String::from_utf8(bytes).map_err(|e| BitformError::InvalidUtf8(e.to_string()))?;
        Ok(())
    }
}

// --- FIXED COLLECTIONS ---

impl<T: Encode, const N: usize> Encode for [T; N] {
    const STRATEGY: Strategy = Strategy::FixedCollection;

    fn encode<S: Serializer>(&self, ser: &mut S) -> Result<()> {
        for item in self {
            ser.put(item)?;
        }
        Ok(())
    }
}

impl<T: Decode, const N: usize> Decode for [T; N] {
    const STRATEGY: Strategy = Strategy::FixedCollection;

    fn decode<D: Deserializer>(&mut self, de: &mut D) -> Result<()> {
        for item in self.iter_mut() {
            de.get(item)?;
        }
        Ok(())
    }
}

// --- FORWARDING AND EMPTY COMPOSITES ---

impl<T: Encode + ?Sized> Encode for Box<T> {
    const STRATEGY: Strategy = T::STRATEGY;

    fn encode<S: Serializer>(&self, ser: &mut S) -> Result<()> {
        (**self).encode(ser)
    }
}

impl<T: Decode + ?Sized> Decode for Box<T> {
    const STRATEGY: Strategy = T::STRATEGY;

    fn decode<D: Deserializer>(&mut self, de: &mut D) -> Result<()> {
        (**self).decode(de)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    const STRATEGY: Strategy = T::STRATEGY;

    fn encode<S: Serializer>(&self, ser: &mut S) -> Result<()> {
        (**self).encode(ser)
    }
}

impl Encode for () {
    const STRATEGY: Strategy = Strategy::Composite;

    fn encode<S: Serializer>(&self, _ser: &mut S) -> Result<()> {
        Ok(())
    }
}

impl Decode for () {
    const STRATEGY: Strategy = Strategy::Composite;

    fn decode<D: Deserializer>(&mut self, _de: &mut D) -> Result<()> {
        Ok(())
    }
}

impl<T: ?Sized> Encode for PhantomData<T> {
    const STRATEGY: Strategy = Strategy::Composite;

    fn encode<S: Serializer>(&self, _ser: &mut S) -> Result<()> {
        Ok(())
    }
}

impl<T: ?Sized> Decode for PhantomData<T> {
    const STRATEGY: Strategy = Strategy::Composite;

    fn decode<D: Deserializer>(&mut self, _de: &mut D) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ByteOrder;
    use crate::io::SliceSource;
    use crate::policy::{decode_strategy, encode_strategy};
    use crate::reader::BitReader;
    use crate::writer::BitWriter;

    fn encode<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
        let mut writer = BitWriter::new(Vec::new(), ByteOrder::MsbFirst);
        writer.put(value).unwrap();
        writer.finish().unwrap()
    }

    fn decode_into<T: Decode>(value: &mut T, bytes: &[u8]) -> Result<()> {
        let mut reader = BitReader::new(SliceSource::new(bytes), ByteOrder::MsbFirst);
        reader.get(value)
    }

    #[test]
    fn test_strategies() {
        assert_eq!(encode_strategy::<u16>(), Strategy::Integer);
        assert_eq!(encode_strategy::<bool>(), Strategy::Integer);
        assert_eq!(encode_strategy::<f64>(), Strategy::Float);
        assert_eq!(encode_strategy::<String>(), Strategy::Collection);
        assert_eq!(encode_strategy::<str>(), Strategy::Collection);
        assert_eq!(decode_strategy::<Vec<u8>>(), Strategy::Collection);
        assert_eq!(decode_strategy::<[u8; 4]>(), Strategy::FixedCollection);
        assert_eq!(decode_strategy::<Box<f32>>(), Strategy::Float);
    }

    #[test]
    fn test_vec_has_word_count_prefix() {
        let out = encode(&vec![0xAAu8, 0xBB]);
        assert_eq!(out, [0, 0, 0, 0, 0, 0, 0, 2, 0xAA, 0xBB]);
    }

    #[test]
    fn test_array_has_no_prefix() {
        assert_eq!(encode(&[1u16, 2]), [0, 1, 0, 2]);
    }

    #[test]
    fn test_float_bit_pattern() {
        assert_eq!(encode(&-1.25f32), (-1.25f32).to_bits().to_be_bytes());
        let nan = f64::from_bits(0x7FF8_0000_0000_0001);
        let mut back = 0.0f64;
        decode_into(&mut back, &encode(&nan)).unwrap();
        assert_eq!(back.to_bits(), nan.to_bits());
    }

    #[test]
    fn test_vec_decode_shrinks_and_grows() {
        let bytes = encode(&vec![7u32, 8, 9]);
        let mut shorter = vec![1u32, 2, 3, 4, 5];
        decode_into(&mut shorter, &bytes).unwrap();
        assert_eq!(shorter, [7, 8, 9]);

        let mut longer = vec![1u32];
        decode_into(&mut longer, &bytes).unwrap();
        assert_eq!(longer, [7, 8, 9]);
    }

    #[test]
    fn test_string_round_trip_and_invalid_utf8() {
        let mut s = String::from("stale");
        decode_into(&mut s, &encode("héllo")).unwrap();
        assert_eq!(s, "héllo");

        let bad = encode(&vec![0xFFu8, 0xFE]);
        assert!(matches!(
            decode_into(&mut s, &bad),
            Err(BitformError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_huge_count_hits_end_of_input() {
        let mut bytes = encode(&(u64::MAX >> 1));
        bytes.push(0);
        let mut v: Vec<u8> = Vec::new();
        assert!(matches!(
            decode_into(&mut v, &bytes),
            Err(BitformError::UnexpectedEof { .. }) | Err(BitformError::LengthOverflow(_))
        ));
    }

    #[test]
    fn test_zero_width_elements_are_bounded() {
        let mut units: Vec<()> = Vec::new();
        assert!(matches!(
            decode_into(&mut units, &encode(&(u64::MAX >> 1))),
            Err(BitformError::ZeroWidthOverflow(n)) if n == u64::MAX >> 1
        ));

        let mut markers: VecDeque<PhantomData<u8>> = VecDeque::new();
        let count = (MAX_ZERO_WIDTH_RUN + 1) as u64;
        assert!(matches!(
            decode_into(&mut markers, &encode(&count)),
            Err(BitformError::ZeroWidthOverflow(n)) if n == count
        ));

        decode_into(&mut units, &encode(&(MAX_ZERO_WIDTH_RUN as u64))).unwrap();
        assert_eq!(units.len(), MAX_ZERO_WIDTH_RUN);
    }

    #[test]
    fn test_vec_deque_round_trip() {
        let src: VecDeque<i16> = [-1, 0, 1].into_iter().collect();
        let mut dst = VecDeque::new();
        decode_into(&mut dst, &encode(&src)).unwrap();
        assert_eq!(src, dst);
    }
}

use std::marker;
use num::PrimInt;
use crate::grib::{GribError, Result};

/// Borrow `len` bytes at `pos`, failing instead of panicking when the range leaves `buf`.
pub fn slice(buf: &[u8], pos: usize, len: usize) -> Result<&[u8]> {
    pos.checked_add(len)
        .and_then(|end| buf.get(pos..end))
        .ok_or(GribError::OutOfBounds { pos, len, size: buf.len() })
}

/// Reads `len` (1 to 4) bytes at `pos` as a big-endian unsigned integer.
pub fn read_unsigned_be(buf: &[u8], pos: usize, len: usize) -> Result<u32> {
    if !(1..=4).contains(&len) {
        return Err(GribError::InvalidWidth(len));
    }

    Ok(slice(buf, pos, len)?
        .iter()
        .fold(0u32, |acc, byte| (acc << 8) | u32::from(*byte)))
}

/// Reads `len` (1 to 4) bytes at `pos` as a GRIB sign-magnitude integer.
///
/// Bit 7 of the first octet is the sign, the remaining `len * 8 - 1` bits are
/// the absolute value. This is *not* two's complement: `0x8001` is `-1` and
/// `0x8000` is a negative zero that reads as `0`.
pub fn read_signed_be(buf: &[u8], pos: usize, len: usize) -> Result<i32> {
    let raw = read_unsigned_be(buf, pos, len)?;
    Ok(sign_magnitude(raw, len * 8))
}

pub(crate) fn sign_magnitude(raw: u32, bits: usize) -> i32 {
    let sign = 1u32 << (bits - 1);
    let magnitude = (raw & (sign - 1)) as i32;
    if raw & sign != 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Reads a 3-octet latitude or longitude: sign in bit 23, millidegrees in bits 0-22.
pub fn read_sign_magnitude_3byte(buf: &[u8], pos: usize) -> Result<f64> {
    let millidegrees = read_signed_be(buf, pos, 3)?;
    Ok(f64::from(millidegrees) / 1000.0)
}

/// Reinterprets 4 big-endian octets as an IEEE-754 single, bit for bit.
pub fn read_f32_bits(buf: &[u8], pos: usize) -> Result<f32> {
    Ok(f32::from_bits(read_unsigned_be(buf, pos, 4)?))
}

/// Unpacks `count` fields of `bit_width` bits, most significant bit first,
/// starting at bit 0 of `buf[start_byte]`.
pub fn unpack_bitfields(buf: &[u8], start_byte: usize, count: usize, bit_width: usize) -> Result<Vec<u32>> {
    if !(1..=32).contains(&bit_width) {
        return Err(GribError::InvalidWidth(bit_width));
    }

    let packed_len = count
        .checked_mul(bit_width)
        .and_then(|bits| bits.checked_add(7))
        .map(|bits| bits / 8)
        .ok_or(GribError::OutOfBounds { pos: start_byte, len: usize::MAX, size: buf.len() })?;
    let packed = slice(buf, start_byte, packed_len)?;

    Ok(BitwiseIterator::<u32>::new(packed, bit_width).take(count).collect())
}

fn widen<T: From<u8>>(octet: u8) -> T {
    T::from(octet)
}

/// Walks a byte slice `size` bits at a time, MSB first, crossing octet boundaries.
pub(crate) struct BitwiseIterator<'a, T: PrimInt + From<u8>> {
    slice: &'a [u8],
    size: usize,
    bit: usize,
    _marker: marker::PhantomData<T>,
}

impl<'a, T: PrimInt + From<u8>> BitwiseIterator<'a, T> {
    pub(crate) fn new(slice: &'a [u8], size: usize) -> Self {
        Self {
            slice,
            size,
            bit: 0,
            _marker: Default::default()
        }
    }
}

impl<'a, T: PrimInt + From<u8>> Iterator for BitwiseIterator<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.bit + self.size;
        if self.size == 0 || end > self.slice.len() * 8 {
            return None;
        }

        let (first, head) = (self.bit / 8, self.bit % 8);
        let leading = self.slice[first] & (0xFF >> head);

        let val = if head + self.size <= 8 {
            widen::<T>(leading >> (8 - head - self.size)) // __###___ -> 00000###
        } else {
            let (full_end, tail) = (end / 8, end % 8);
            let mut val = widen::<T>(leading);
            for byte in &self.slice[first + 1..full_end] {
                val = (val << 8) | widen::<T>(*byte);
            }
            if tail > 0 {
                val = (val << tail) | widen::<T>(self.slice[full_end] >> (8 - tail));
            }
            val
        };

        self.bit = end;

        Some(val)
    }
}

pub mod simple;

use crate::grib::{DecodeOptions, GribError, Result};
use crate::grib::sections::sect4::simple::SimpleDecoderIterator;
use crate::grib::utils::{read_f32_bits, read_signed_be, read_unsigned_be, unpack_bitfields};

/// Packed data starts at octet 12 of the section
pub const DATA_OFFSET: usize = 11;
/// Number of words folded into the combined-bits diagnostic
pub const COMBINED_WORDS: usize = 3;

const UNUSED_BITS_MASK: u8 = 0x0F;

/// Section 4: Binary Data Section, grid point data with simple packing
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryData {
    /// Length of the section in octets
    pub length: u32,
    /// Flag (see Code Table 11) and number of unused bits at the end of the section
    pub flags: u8,
    /// Scale factor (E)
    pub binary_scale: i16,
    /// Reference value (R), IEEE-754 single precision
    pub reference_value: f32,
    /// Number of bits containing each packed value
    pub bits_per_value: u8,
    /// Raw packed words that were unpacked from the data
    pub words: Vec<u32>,
}

impl BinaryData {
    pub(crate) fn from_octets(buf: &[u8], pos: usize, options: &DecodeOptions) -> Result<Self> {
        let mut bds = BinaryData {
            length: read_unsigned_be(buf, pos, 3)?,
            flags: read_unsigned_be(buf, pos + 3, 1)? as u8,
            binary_scale: read_signed_be(buf, pos + 4, 2)? as i16,
            reference_value: read_f32_bits(buf, pos + 6)?,
            bits_per_value: read_unsigned_be(buf, pos + 10, 1)? as u8,
            words: Vec::new(),
        };

        let count = options.word_count(&bds);
        bds.words = match bds.bits_per_value {
            // constant field, every value is the reference value
            0 => constant_words(count)?,
            bits => unpack_bitfields(buf, pos + DATA_OFFSET, count, bits.into())?,
        };

        Ok(bds)
    }

    pub fn unused_bits(&self) -> usize {
        (self.flags & UNUSED_BITS_MASK).into()
    }

    /// Number of words the section declares room for, zero for a constant field.
    pub fn packed_word_count(&self) -> usize {
        if self.bits_per_value == 0 {
            return 0;
        }

        let data_bits = (self.length as usize).saturating_sub(DATA_OFFSET) * 8;
        data_bits.saturating_sub(self.unused_bits()) / usize::from(self.bits_per_value)
    }

    /// The first words concatenated at their packed width, most significant first.
    pub fn combined_bits(&self) -> u128 {
        self.words
            .iter()
            .take(COMBINED_WORDS)
            .fold(0u128, |acc, word| (acc << self.bits_per_value) | u128::from(*word))
    }

    pub fn values(&self, decimal_scale: i16) -> SimpleDecoderIterator<impl Iterator<Item = u32> + '_, u32> {
        SimpleDecoderIterator::new(
            self.words.iter().copied(),
            self.reference_value,
            self.binary_scale.into(),
            decimal_scale.into(),
        )
    }
}

/// Nothing in the buffer bounds a constant field, so the allocation is checked instead.
fn constant_words(count: usize) -> Result<Vec<u32>> {
    let mut words = Vec::new();
    words
        .try_reserve_exact(count)
        .map_err(|e| GribError::DecodeError(format!("{} constant words: {}", count, e)))?;
    words.resize(count, 0);
    Ok(words)
}

use crate::grib::Result;
use crate::grib::utils::read_unsigned_be;

/// Section 3: Bit Map Section.
///
/// Only its length is read so the decoder can step over it; the bitmap
/// itself is never applied to the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitMap {
    /// Length of the section in octets
    pub length: u32,
}

impl BitMap {
    pub(crate) fn from_octets(buf: &[u8], pos: usize) -> Result<Self> {
        Ok(BitMap {
            length: read_unsigned_be(buf, pos, 3)?,
        })
    }
}

use crate::grib::Result;
use crate::grib::utils::{read_sign_magnitude_3byte, read_signed_be, read_unsigned_be, slice};

/// Octets 29-33: the trailing resolution and scanning bytes
pub const TRAILING_OFFSET: usize = 28;
pub const TRAILING_SIZE: usize = 5;

/// Section 2: Grid Description Section, read with the latitude/longitude layout
#[derive(Debug, Clone, PartialEq)]
pub struct GridDescription {
    /// Length of the section in octets
    pub length: u32,
    /// Data representation type (see Code Table 6), 0 for latitude/longitude
    pub representation: u8,
    pub rows: i32,
    pub columns: i32,
    /// Latitude of first grid point, degrees
    pub la1: f64,
    /// Longitude of first grid point, degrees
    pub lo1: f64,
    /// Latitude of last grid point, degrees
    pub la2: f64,
    /// Longitude of last grid point, degrees
    pub lo2: f64,
    /// Octets 29 to 33, starting with the last octet of the j direction increment
    pub trailing: [u8; TRAILING_SIZE],
}

impl GridDescription {
    pub(crate) fn from_octets(buf: &[u8], pos: usize) -> Result<Self> {
        let mut trailing = [0; TRAILING_SIZE];
        trailing.copy_from_slice(slice(buf, pos + TRAILING_OFFSET, TRAILING_SIZE)?);

        Ok(GridDescription {
            length: read_unsigned_be(buf, pos, 3)?,
            representation: read_unsigned_be(buf, pos + 5, 1)? as u8,
            rows: read_signed_be(buf, pos + 6, 2)?,
            columns: read_signed_be(buf, pos + 8, 2)?,
            la1: read_sign_magnitude_3byte(buf, pos + 10)?,
            lo1: read_sign_magnitude_3byte(buf, pos + 13)?,
            la2: read_sign_magnitude_3byte(buf, pos + 17)?,
            lo2: read_sign_magnitude_3byte(buf, pos + 20)?,
            trailing,
        })
    }

    pub fn is_lat_lon(&self) -> bool {
        self.representation == 0
    }
}

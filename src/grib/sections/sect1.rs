use std::fmt::{Display, Formatter};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use crate::grib::Result;
use crate::grib::utils::{read_signed_be, read_unsigned_be, slice};

const FLAG_GDS_PRESENT: u8 = 0x80;
const FLAG_BMS_PRESENT: u8 = 0x40;

/// Octets 13-17 hold year of century, month, day, hour and minute
const REF_TIME_OFFSET: usize = 12;
const DECIMAL_SCALE_OFFSET: usize = 26;

/// Section 1: Product Definition Section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDefinition {
    /// Length of the section in octets
    pub length: u32,
    /// Parameter Table Version number
    pub table_version: u8,
    /// Identification of originating/generating centre (see Code Table 0)
    pub centre_id: u8,
    /// Generating process ID number
    pub process_id: u8,
    /// Grid identification (see Code Table B)
    pub grid_id: u8,
    /// Flag specifying the presence or absence of a GDS or a BMS
    pub flags: u8,
    /// Indicator of parameter and units (see Code Table 2)
    pub parameter: u8,
    /// Indicator of type of level or layer (see Code Table 3)
    pub level_type: u8,
    /// Reference time of data
    pub ref_time: RefTime,
    /// Units decimal scale factor (D)
    pub decimal_scale: i16,
}

impl ProductDefinition {
    pub(crate) fn from_octets(buf: &[u8], pos: usize) -> Result<Self> {
        let head = slice(buf, pos, 10)?;
        let time = slice(buf, pos + REF_TIME_OFFSET, 5)?;

        Ok(ProductDefinition {
            length: read_unsigned_be(head, 0, 3)?,
            table_version: head[3],
            centre_id: head[4],
            process_id: head[5],
            grid_id: head[6],
            flags: head[7],
            parameter: head[8],
            level_type: head[9],
            ref_time: RefTime {
                year: 2000 + u16::from(time[0]),
                month: time[1],
                day: time[2],
                hour: time[3],
                minute: time[4],
            },
            decimal_scale: read_signed_be(buf, pos + DECIMAL_SCALE_OFFSET, 2)? as i16,
        })
    }

    pub fn has_gds(&self) -> bool {
        self.flags & FLAG_GDS_PRESENT != 0
    }

    pub fn has_bms(&self) -> bool {
        self.flags & FLAG_BMS_PRESENT != 0
    }
}

/// Reference time as stored in the PDS, the century always taken as 2000.
///
/// Kept as raw fields since nothing guarantees the octets form a real date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
}

impl RefTime {
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let naive = NaiveDate::from_ymd_opt(self.year.into(), self.month.into(), self.day.into())?
            .and_hms_opt(self.hour.into(), self.minute.into(), 0)?;

        Some(Utc.from_utc_datetime(&naive))
    }
}

impl Display for RefTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02} {:02}:{:02}", self.year, self.month, self.day, self.hour, self.minute)
    }
}

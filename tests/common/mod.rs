//! Synthetic GRIB1 records for the integration tests.

#![allow(dead_code)]

pub const PDS_LENGTH: usize = 28;
pub const GDS_LENGTH: usize = 33;
pub const BDS_HEADER: usize = 11;

/// Builds one GRIB1 record octet by octet.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    pub flags: u8,
    pub decimal_scale: i16,
    pub binary_scale: i16,
    pub reference_value: f32,
    pub bits_per_value: u8,
    pub words: Vec<u32>,
    pub bitmap: Vec<u8>,
    pub total_length: Option<u32>,
    pub end_section: bool,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self {
            flags: 0x00,
            decimal_scale: 0,
            binary_scale: 0,
            reference_value: 0.0,
            bits_per_value: 10,
            words: vec![0, 1, 2],
            bitmap: Vec::new(),
            total_length: None,
            end_section: true,
        }
    }
}

pub fn u24(value: usize) -> [u8; 3] {
    let bytes = (value as u32).to_be_bytes();
    [bytes[1], bytes[2], bytes[3]]
}

/// GRIB sign-magnitude encoding of a 16-bit value.
pub fn sign_magnitude16(value: i16) -> [u8; 2] {
    let magnitude = value.unsigned_abs();
    let raw = if value < 0 { magnitude | 0x8000 } else { magnitude };
    raw.to_be_bytes()
}

/// GRIB sign-magnitude millidegrees over 3 octets.
pub fn coordinate(degrees: f64) -> [u8; 3] {
    let millis = (degrees.abs() * 1000.0).round() as usize;
    let mut bytes = u24(millis);
    if degrees < 0.0 {
        bytes[0] |= 0x80;
    }
    bytes
}

pub fn pack(values: &[u32], width: usize) -> Vec<u8> {
    let mut out = vec![0u8; (values.len() * width + 7) / 8];
    for (i, value) in values.iter().enumerate() {
        for bit in 0..width {
            if (value >> (width - 1 - bit)) & 1 == 1 {
                let pos = i * width + bit;
                out[pos / 8] |= 0x80 >> (pos % 8);
            }
        }
    }
    out
}

impl RecordBuilder {
    pub fn pds(&self) -> Vec<u8> {
        let mut pds = vec![0u8; PDS_LENGTH];
        pds[0..3].copy_from_slice(&u24(PDS_LENGTH));
        pds[3] = 3;
        pds[4] = 7;
        pds[5] = 96;
        pds[6] = 255;
        pds[7] = self.flags;
        pds[8] = 11;
        pds[9] = 105;
        // 2015-03-10 00:00
        pds[12..17].copy_from_slice(&[15, 3, 10, 0, 0]);
        pds[26..28].copy_from_slice(&sign_magnitude16(self.decimal_scale));
        pds
    }

    pub fn gds(&self) -> Vec<u8> {
        let mut gds = vec![0u8; GDS_LENGTH];
        gds[0..3].copy_from_slice(&u24(GDS_LENGTH));
        gds[6..8].copy_from_slice(&sign_magnitude16(144));
        gds[8..10].copy_from_slice(&sign_magnitude16(73));
        gds[10..13].copy_from_slice(&coordinate(90.0));
        gds[13..16].copy_from_slice(&coordinate(0.0));
        gds[16] = 0x80;
        gds[17..20].copy_from_slice(&coordinate(-90.0));
        gds[20..23].copy_from_slice(&coordinate(357.5));
        gds[28..33].copy_from_slice(&[0xC4, 0x09, 0xC4, 0x00, 0x00]);
        gds
    }

    pub fn bms(&self) -> Vec<u8> {
        let mut bms = u24(6 + self.bitmap.len()).to_vec();
        bms.extend_from_slice(&[0, 0, 0]);
        bms.extend_from_slice(&self.bitmap);
        bms
    }

    pub fn bds(&self) -> Vec<u8> {
        let packed = pack(&self.words, self.bits_per_value.into());
        let mut bds = u24(BDS_HEADER + packed.len()).to_vec();
        bds.push(0);
        bds.extend_from_slice(&sign_magnitude16(self.binary_scale));
        bds.extend_from_slice(&self.reference_value.to_bits().to_be_bytes());
        bds.push(self.bits_per_value);
        bds.extend_from_slice(&packed);
        bds
    }

    /// Sections 1 to 4 in order, as the PDS flags announce them.
    pub fn sections(&self) -> Vec<u8> {
        let mut sections = self.pds();
        if self.flags & 0x80 != 0 {
            sections.extend(self.gds());
        }
        if self.flags & 0x40 != 0 {
            sections.extend(self.bms());
        }
        sections.extend(self.bds());
        sections
    }

    pub fn build(&self) -> Vec<u8> {
        let sections = self.sections();
        let end = if self.end_section { 4 } else { 0 };
        let total_length = self.total_length.unwrap_or((8 + sections.len() + end) as u32);

        let mut record = b"GRIB".to_vec();
        record.extend_from_slice(&u24(total_length as usize));
        record.push(1);
        record.extend(sections);
        if self.end_section {
            record.extend_from_slice(b"7777");
        }
        record
    }
}

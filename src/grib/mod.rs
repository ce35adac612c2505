pub mod sections;
pub mod utils;

use crate::grib::sections::{Indicator, Stage, SECT0_IS_SIZE};
use crate::grib::sections::sect1::ProductDefinition;
use crate::grib::sections::sect2::GridDescription;
use crate::grib::sections::sect3::BitMap;
use crate::grib::sections::sect4::BinaryData;
use crate::grib::utils::read_unsigned_be;

pub const SECT0_IS_MAGIC: &[u8] = b"GRIB";
pub const SECT5_ES_MAGIC: &[u8] = b"7777";
const MAGIC_SIZE: usize = 4;
const SUPPORTED_EDITION: u8 = 1;

/// Words unpacked per record unless told otherwise
pub const DEFAULT_SAMPLE_WORDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// How many packed words to unpack from each BDS.
    ///
    /// Only a sample is read by default: this is a reporting tool, and three
    /// words are enough to check the packing parameters of a field.
    pub sample_words: usize,
    /// Unpack every word the BDS declares instead of `sample_words`
    pub all_words: bool,
    /// Step over a Bit Map Section when the PDS flags announce one
    pub skip_bitmap: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            sample_words: DEFAULT_SAMPLE_WORDS,
            all_words: false,
            skip_bitmap: false,
        }
    }
}

impl DecodeOptions {
    pub(crate) fn word_count(&self, bds: &BinaryData) -> usize {
        if self.all_words && bds.bits_per_value > 0 {
            bds.packed_word_count()
        } else {
            self.sample_words
        }
    }
}

/// One decoded GRIB1 record, found at `start` in the scanned buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub start: usize,
    pub indicator: Indicator,
    pub product_definition: ProductDefinition,
    pub grid_description: Option<GridDescription>,
    pub bitmap: Option<BitMap>,
    pub binary_data: BinaryData,
    /// `"7777"` follows the BDS directly
    pub end_section: bool,
}

impl Record {
    /// Section 0 plus every section that was walked through.
    pub fn section_sum(&self) -> u64 {
        SECT0_IS_SIZE as u64
            + u64::from(self.product_definition.length)
            + self.grid_description.as_ref().map_or(0, |gds| u64::from(gds.length))
            + self.bitmap.as_ref().map_or(0, |bms| u64::from(bms.length))
            + u64::from(self.binary_data.length)
    }

    /// Whether the walked sections add up to the length Section 0 announces,
    /// with or without the end section.
    pub fn is_consistent(&self) -> bool {
        let total_length = u64::from(self.indicator.total_length);
        self.section_sum() == total_length
            || (self.end_section && self.section_sum() + SECT5_ES_MAGIC.len() as u64 == total_length)
    }

    pub fn values(&self) -> Vec<f32> {
        self.binary_data.values(self.product_definition.decimal_scale).collect()
    }

    /// Offset right past the record as declared by its Indicator Section.
    pub fn end(&self) -> usize {
        self.start + (self.indicator.total_length as usize).max(1)
    }
}

/// Decodes the record whose `"GRIB"` marker sits at `start`.
pub fn decode_record(buf: &[u8], start: usize, options: &DecodeOptions) -> Result<Record> {
    let mut reader = GribReader::new(buf, start);

    let mut indicator = None;
    let mut product_definition: Option<ProductDefinition> = None;
    let mut grid_description = None;
    let mut bitmap = None;
    let mut binary_data = None;
    let mut end_section = false;

    let mut stage = Stage::Indicator;
    while stage != Stage::Done {
        debug!("Record {} : {:?} at {}", start, stage, reader.cursor);

        stage = match stage {
            Stage::Indicator => {
                indicator = Some(reader.read_sect0()?);
                Stage::ProductDefinition
            }
            Stage::ProductDefinition => {
                let section = reader.read_sect1()?;
                let next = if section.has_gds() {
                    Stage::GridDescription
                } else {
                    after_grid(&section, options)
                };
                product_definition = Some(section);
                next
            }
            Stage::GridDescription => {
                grid_description = Some(reader.read_sect2()?);
                match &product_definition {
                    Some(section) => after_grid(section, options),
                    None => Stage::BinaryData,
                }
            }
            Stage::BitMap => {
                bitmap = Some(reader.read_sect3()?);
                Stage::BinaryData
            }
            Stage::BinaryData => {
                binary_data = Some(reader.read_sect4(options)?);
                end_section = reader.at_sect5();
                Stage::Done
            }
            Stage::Done => Stage::Done,
        };
    }

    Ok(Record {
        start,
        indicator: indicator.ok_or(GribError::DecodeError(String::from("Missing Section 0")))?,
        product_definition: product_definition.ok_or(GribError::DecodeError(String::from("Missing Section 1")))?,
        grid_description,
        bitmap,
        binary_data: binary_data.ok_or(GribError::DecodeError(String::from("Missing Section 4")))?,
        end_section,
    })
}

fn after_grid(section: &ProductDefinition, options: &DecodeOptions) -> Stage {
    if options.skip_bitmap && section.has_bms() {
        Stage::BitMap
    } else {
        Stage::BinaryData
    }
}

/// Walks the sections of one record, each length prefix moving the cursor to the next.
struct GribReader<'a> {
    buf: &'a [u8],
    cursor: usize,
}

impl<'a> GribReader<'a> {
    fn new(buf: &'a [u8], start: usize) -> Self {
        Self { buf, cursor: start }
    }

    /// Steps over a section, which must lie within the buffer as declared.
    fn advance(&mut self, length: u32) -> Result<()> {
        utils::slice(self.buf, self.cursor, length as usize)?;
        self.cursor += length as usize;
        Ok(())
    }

    fn read_sect0(&mut self) -> Result<Indicator> {
        let buf = utils::slice(self.buf, self.cursor, SECT0_IS_SIZE)?;

        if &buf[0..MAGIC_SIZE] != SECT0_IS_MAGIC {
            return Err(GribError::NotGRIB(self.cursor));
        }

        let indicator = Indicator {
            total_length: read_unsigned_be(buf, 4, 3)?,
            edition: buf[7],
        };

        if indicator.edition != SUPPORTED_EDITION {
            warn!("Record {} : edition {} read with the edition {} layout", self.cursor, indicator.edition, SUPPORTED_EDITION);
        }

        utils::slice(self.buf, self.cursor, indicator.total_length as usize)?;

        debug!("Read section {} : {}", 0, SECT0_IS_SIZE);
        self.cursor += SECT0_IS_SIZE;

        Ok(indicator)
    }

    fn read_sect1(&mut self) -> Result<ProductDefinition> {
        let section = ProductDefinition::from_octets(self.buf, self.cursor)?;
        debug!("Read section {} : {}", 1, section.length);
        self.advance(section.length)?;
        Ok(section)
    }

    fn read_sect2(&mut self) -> Result<GridDescription> {
        let section = GridDescription::from_octets(self.buf, self.cursor)?;
        if !section.is_lat_lon() {
            debug!("Grid representation {} read as latitude/longitude", section.representation);
        }
        debug!("Read section {} : {}", 2, section.length);
        self.advance(section.length)?;
        Ok(section)
    }

    fn read_sect3(&mut self) -> Result<BitMap> {
        let section = BitMap::from_octets(self.buf, self.cursor)?;
        debug!("Skip section {} : {}", 3, section.length);
        self.advance(section.length)?;
        Ok(section)
    }

    fn read_sect4(&mut self, options: &DecodeOptions) -> Result<BinaryData> {
        let section = BinaryData::from_octets(self.buf, self.cursor, options)?;
        debug!("Read section {} : {} ({} words)", 4, section.length, section.words.len());
        self.advance(section.length)?;
        Ok(section)
    }

    fn at_sect5(&self) -> bool {
        utils::slice(self.buf, self.cursor, SECT5_ES_MAGIC.len()).map_or(false, |magic| magic == SECT5_ES_MAGIC)
    }
}

/// A 4-octet marker found while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `"GRIB"`, the start of a record
    Start(usize),
    /// `"7777"`, the end of the usable data
    End(usize),
}

/// Raw marker positions in a buffer, without decoding anything.
///
/// Every offset is tried in turn; the iterator stops after the first `End`.
pub struct Markers<'a> {
    buf: &'a [u8],
    pos: usize,
    finished: bool,
}

impl<'a> Markers<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0, finished: false }
    }
}

impl<'a> Iterator for Markers<'a> {
    type Item = Marker;

    fn next(&mut self) -> Option<Marker> {
        if self.finished {
            return None;
        }

        while self.pos + MAGIC_SIZE <= self.buf.len() {
            let pos = self.pos;
            self.pos += 1;

            match &self.buf[pos..pos + MAGIC_SIZE] {
                magic if magic == SECT5_ES_MAGIC => {
                    self.finished = true;
                    return Some(Marker::End(pos));
                }
                magic if magic == SECT0_IS_MAGIC => return Some(Marker::Start(pos)),
                _ => {}
            }
        }

        self.finished = true;
        None
    }
}

#[derive(Debug)]
pub enum Scanned {
    Record(Record),
    /// A marker whose record could not be read; scanning went on one byte further
    Malformed { start: usize, error: GribError },
    End { offset: usize },
}

/// Finds and decodes every record of a buffer, in order.
///
/// A decoded record is skipped as a whole using its declared total length.
/// A record that fails to decode is dropped and the scan restarts on the byte
/// after its marker, so a `"GRIB"` lying inside its data may be picked up next.
pub struct Scanner<'a> {
    markers: Markers<'a>,
    options: DecodeOptions,
}

impl<'a> Scanner<'a> {
    pub fn new(buf: &'a [u8], options: DecodeOptions) -> Self {
        Self {
            markers: Markers::new(buf),
            options,
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Scanned;

    fn next(&mut self) -> Option<Scanned> {
        match self.markers.next()? {
            Marker::End(offset) => {
                debug!("End marker at {}", offset);
                Some(Scanned::End { offset })
            }
            Marker::Start(start) => match decode_record(self.markers.buf, start, &self.options) {
                Ok(record) => {
                    if !record.is_consistent() {
                        warn!("Record {} : sections add up to {} but length is {}", start, record.section_sum(), record.indicator.total_length);
                    }
                    self.markers.pos = record.end();
                    Some(Scanned::Record(record))
                }
                Err(error) => {
                    warn!("Record {} abandoned : {}", start, error);
                    Some(Scanned::Malformed { start, error })
                }
            },
        }
    }
}

pub type Result<T, E = GribError> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum GribError {
    #[error("OutOfBounds({len} octets at {pos}, buffer is {size})")]
    OutOfBounds { pos: usize, len: usize, size: usize },

    #[error("InvalidWidth({0})")]
    InvalidWidth(usize),

    #[error("NotGRIB({0})")]
    NotGRIB(usize),

    #[error("DecodeError({0})")]
    DecodeError(String)
}

pub mod sect1;
pub mod sect2;
pub mod sect3;
pub mod sect4;

/// Size of Section 0, the Indicator Section, in GRIB edition 1
pub const SECT0_IS_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    /// Total length of GRIB message in octets (including Section 0)
    pub total_length: u32,
    /// GRIB Edition Number (1 for the records this crate understands)
    pub edition: u8,
}

/// Where the section decoder stands within one record.
///
/// Stages are visited strictly in declaration order; `GridDescription` and
/// `BitMap` may be skipped depending on the PDS flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Indicator,
    ProductDefinition,
    GridDescription,
    BitMap,
    BinaryData,
    Done,
}

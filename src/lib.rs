#[macro_use]
extern crate log;

pub mod config;
pub mod error;
pub mod grib;
pub mod report;

use std::path::Path;

/// Reads the whole input up front; nothing is decoded from a partial file.
pub fn load_bytes(path: &Path) -> error::Result<Vec<u8>> {
    let bytes = std::fs::read(path)?;
    debug!("Loaded {:?} : {} octets", path, bytes.len());
    Ok(bytes)
}

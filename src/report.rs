use std::io::Write;
use crate::error::Result;
use crate::grib::{DecodeOptions, Record, Scanned, Scanner};

/// Receives the report one line at a time, in decode order.
pub trait ReportSink {
    fn emit_line(&mut self, line: &str) -> std::io::Result<()>;
}

/// Writes report lines as text, one per line.
pub struct TextReport<W: Write> {
    writer: W,
}

impl<W: Write> TextReport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for TextReport<W> {
    fn emit_line(&mut self, line: &str) -> std::io::Result<()> {
        writeln!(self.writer, "{}", line)
    }
}

impl ReportSink for Vec<String> {
    fn emit_line(&mut self, line: &str) -> std::io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// What a whole scan went through.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub records: usize,
    pub inconsistent: usize,
    pub abandoned: usize,
    /// Offset of the `"7777"` marker that stopped the scan, if any
    pub end: Option<usize>,
}

/// Scans `buf` and reports every record found to `sink`.
pub fn dump<S: ReportSink>(buf: &[u8], options: &DecodeOptions, sink: &mut S) -> Result<Summary> {
    let mut summary = Summary::default();

    for scanned in Scanner::new(buf, options.clone()) {
        match scanned {
            Scanned::Record(record) => {
                summary.records += 1;
                if !record.is_consistent() {
                    summary.inconsistent += 1;
                }
                write_record(sink, &record)?;
            }
            Scanned::Malformed { start, error } => {
                summary.abandoned += 1;
                sink.emit_line(&format!("Record at {} abandoned: {}", start, error))?;
            }
            Scanned::End { offset } => {
                summary.end = Some(offset);
                sink.emit_line(&format!("Found 7777 at {} - end", offset))?;
            }
        }
    }

    info!("{} records, {} inconsistent, {} abandoned", summary.records, summary.inconsistent, summary.abandoned);

    Ok(summary)
}

pub fn write_record<S: ReportSink>(sink: &mut S, record: &Record) -> std::io::Result<()> {
    let pds = &record.product_definition;
    let bds = &record.binary_data;

    sink.emit_line(&format!("Record at {}", record.start))?;
    sink.emit_line(&format!("Section 0 length={} octets edition={}", record.indicator.total_length, record.indicator.edition))?;

    sink.emit_line(&format!("Section 1 length={}", pds.length))?;
    sink.emit_line(&format!("  GDS={}  BMS={}", pds.has_gds(), pds.has_bms()))?;
    sink.emit_line(&format!("  decimal_scale={}", pds.decimal_scale))?;
    match pds.ref_time.to_datetime() {
        Some(_) => sink.emit_line(&format!("  date={}", pds.ref_time))?,
        None => sink.emit_line(&format!("  date={} (invalid)", pds.ref_time))?,
    }

    if let Some(gds) = &record.grid_description {
        sink.emit_line(&format!("Section 2 length={}", gds.length))?;
        sink.emit_line(&format!("  rows/columns: {}, {}", gds.rows, gds.columns))?;
        sink.emit_line(&format!("  la1={}  lo1={}  la2={}  lo2={}", gds.la1, gds.lo1, gds.la2, gds.lo2))?;
        for (n, octet) in gds.trailing.iter().enumerate() {
            sink.emit_line(&format!("  octet {}={}", 29 + n, octet))?;
        }
    }

    if let Some(bms) = &record.bitmap {
        sink.emit_line(&format!("Section 3 length={} skipped", bms.length))?;
    }

    sink.emit_line(&format!("Section 4 length={}", bds.length))?;
    sink.emit_line(&format!("  binary_scale={}", bds.binary_scale))?;
    sink.emit_line(&format!("  ref_value={}", bds.reference_value))?;
    sink.emit_line(&format!("  bits_per_value={}", bds.bits_per_value))?;
    for (n, word) in bds.words.iter().enumerate() {
        sink.emit_line(&format!("  w{}={}", n + 1, word))?;
    }
    sink.emit_line(&format!("  combined_bits={}", bds.combined_bits()))?;

    sink.emit_line(&format!(
        "Sum={}{} length={} {}",
        record.section_sum(),
        if record.end_section { "+7777" } else { "" },
        record.indicator.total_length,
        if record.is_consistent() { "OK" } else { "MISMATCH" }
    ))?;

    sink.emit_line("Data sample:")?;
    for (n, value) in record.values().iter().enumerate() {
        sink.emit_line(&format!("  value {}={}", n + 1, value))?;
    }
    sink.emit_line("")
}

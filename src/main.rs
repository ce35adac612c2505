use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use anyhow::Context;
use structopt::StructOpt;

#[macro_use] extern crate log;

use grib1dump::config::Config;
use grib1dump::report::{self, TextReport};

#[derive(Debug, StructOpt)]
#[structopt(about = "Dump the records of a GRIB edition 1 file as text")]
struct Cli {
    /// GRIB file to read
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// report file, overrides the config
    #[structopt(long = "output", short = "o", parse(from_os_str))]
    output: Option<PathBuf>,

    /// YAML config file
    #[structopt(long = "config", short = "c", parse(from_os_str))]
    config_file: Option<PathBuf>,

    /// number of packed words read from each record
    #[structopt(long = "words")]
    words: Option<usize>,

    /// read every packed word instead of a sample
    #[structopt(long = "all-words")]
    all_words: bool,

    /// step over the bitmap section when there is one
    #[structopt(long = "skip-bitmap")]
    skip_bitmap: bool,
}

fn main() -> anyhow::Result<()> {

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "error,grib1dump=info");
    }
    env_logger::init();

    let args = Cli::from_args();

    let mut config = match &args.config_file {
        Some(path) => Config::load(path).with_context(|| format!("loading config {:?}", path))?,
        None => Config::default(),
    };
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(words) = args.words {
        config.sample_words = words;
    }
    config.all_words |= args.all_words;
    config.skip_bitmap |= args.skip_bitmap;

    let bytes = grib1dump::load_bytes(&args.input)
        .with_context(|| format!("reading {:?}", args.input))?;

    let file = File::create(&config.output)
        .with_context(|| format!("creating {:?}", config.output))?;
    let mut sink = TextReport::new(BufWriter::new(file));

    let summary = report::dump(&bytes, &config.decode_options(), &mut sink)?;
    sink.into_inner().flush()?;

    info!("{:?} : {} records written to {:?}", args.input, summary.records, config.output);

    Ok(())
}

use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use crate::error::Result;
use crate::grib::{DecodeOptions, DEFAULT_SAMPLE_WORDS};

pub const DEFAULT_OUTPUT: &str = "results.txt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
  /// Where the text report goes
  pub output: PathBuf,
  pub sample_words: usize,
  pub all_words: bool,
  pub skip_bitmap: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      output: PathBuf::from(DEFAULT_OUTPUT),
      sample_words: DEFAULT_SAMPLE_WORDS,
      all_words: false,
      skip_bitmap: false,
    }
  }
}

impl Config {
  /// Loads a YAML config file; confy writes the defaults out when it does not exist yet.
  pub fn load(path: &Path) -> Result<Self> {
    Ok(confy::load_path(path)?)
  }

  pub fn decode_options(&self) -> DecodeOptions {
    DecodeOptions {
      sample_words: self.sample_words,
      all_words: self.all_words,
      skip_bitmap: self.skip_bitmap,
    }
  }
}

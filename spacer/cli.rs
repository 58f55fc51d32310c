use std::path::PathBuf;

use anyhow::Result;
use clap::{
  ArgAction,
  Parser,
};
use spacer_core::{
  Position,
  Selection,
};

/// Inserted text assumed when no `--change` is given.
pub const DEFAULT_CHANGE: &str = "{";

#[derive(Clone, Debug)]
pub struct CliOptions {
  pub verbosity:   u8,
  pub log_file:    Option<PathBuf>,
  pub config_file: Option<PathBuf>,
  pub file:        PathBuf,
  pub selections:  Vec<Selection>,
  pub changes:     Vec<String>,
  pub in_place:    bool,
}

impl CliOptions {
  pub fn parse() -> Result<Self> {
    let raw = RawCli::parse();
    raw.try_into()
  }
}

#[derive(Parser, Debug)]
#[command(
  name = "spacer",
  about = "Space out template tags the way an editor would while typing",
  long_about = None,
  version
)]
struct RawCli {
  /// Increase logging verbosity (repeat for more detail)
  #[arg(short = 'v', action = ArgAction::Count)]
  verbosity: u8,

  /// Save logs to a specific file
  #[arg(long = "log", value_name = "FILE")]
  log_file: Option<PathBuf>,

  /// Load configuration from a specific file
  #[arg(short = 'c', long = "config", value_name = "FILE")]
  config_file: Option<PathBuf>,

  /// Selection as LINE:COL or LINE:COL-LINE:COL, 1-based (repeat for more
  /// cursors)
  #[arg(short = 's', long = "select", value_name = "SELECTION", value_parser = parse_selection)]
  selections: Vec<Selection>,

  /// Text the editor just inserted (repeat for several changes)
  #[arg(long = "change", value_name = "TEXT")]
  changes: Vec<String>,

  /// Write the result back to FILE instead of printing it
  #[arg(short = 'i', long = "in-place")]
  in_place: bool,

  /// Document that already contains the typed text
  #[arg(value_name = "FILE")]
  file: PathBuf,
}

impl TryFrom<RawCli> for CliOptions {
  type Error = anyhow::Error;

  fn try_from(raw: RawCli) -> Result<Self> {
    let changes = if raw.changes.is_empty() {
      vec![DEFAULT_CHANGE.to_string()]
    } else {
      raw.changes
    };

    Ok(Self {
      verbosity: raw.verbosity,
      log_file: raw.log_file,
      config_file: raw.config_file,
      file: raw.file,
      selections: raw.selections,
      changes,
      in_place: raw.in_place,
    })
  }
}

fn parse_selection(value: &str) -> std::result::Result<Selection, String> {
  match value.split_once('-') {
    Some((anchor, active)) => Ok(Selection::new(parse_position(anchor)?, parse_position(active)?)),
    None => parse_position(value).map(Selection::caret),
  }
}

fn parse_position(value: &str) -> std::result::Result<Position, String> {
  let (line, col) = value
    .split_once(':')
    .ok_or_else(|| format!("expected LINE:COL, got '{value}'"))?;
  let number = |part: &str| {
    part
      .trim()
      .parse::<usize>()
      .ok()
      .filter(|n| *n > 0)
      .ok_or_else(|| format!("'{part}' is not a line or column number (they start at 1)"))
  };
  Ok(Position::new(number(line)? - 1, number(col)? - 1))
}

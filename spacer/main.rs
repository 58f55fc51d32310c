mod cli;
mod logging;
mod paths;

use std::fs;

use anyhow::{
  Context,
  Result,
};
use spacer_core::{
  Position,
  Range,
  Selection,
};
use spacer_lib::{
  ContentChange,
  DocumentChangeEvent,
  SpacerConfig,
  TriggerFilter,
  buffer::{
    Buffer,
    Workspace,
  },
  host::TextEditor,
};

use crate::cli::CliOptions;

fn main() -> Result<()> {
  let options = CliOptions::parse()?;
  logging::setup_logging(options.verbosity, options.log_file.as_deref())?;

  let config_path = match &options.config_file {
    Some(path) => path.clone(),
    None => paths::default_config_file()?,
  };
  let config = SpacerConfig::load(&config_path)
    .with_context(|| format!("failed to load config {}", config_path.display()))?;
  log::debug!("config: {config:?}");

  let text = fs::read_to_string(&options.file)
    .with_context(|| format!("failed to read {}", options.file.display()))?;
  let buffer = run(&options, config, &text)?;

  if options.in_place {
    fs::write(&options.file, buffer.to_string())
      .with_context(|| format!("failed to write {}", options.file.display()))?;
  } else {
    print!("{buffer}");
  }

  Ok(())
}

/// Feed the requested changes through the trigger filter and return the
/// resulting buffer.
fn run(options: &CliOptions, config: SpacerConfig, text: &str) -> Result<Buffer> {
  let mut buffer = Buffer::new(text);
  if !options.selections.is_empty() {
    buffer.set_selections(options.selections.iter().copied());
  }

  // The document already holds the typed text, so every change is reported
  // as an insertion at the primary caret.
  let caret = buffer
    .selections()
    .first()
    .map(|selection| selection.active)
    .unwrap_or_default();
  let content_changes = options
    .changes
    .iter()
    .map(|text| {
      ContentChange {
        range:        Range::point(caret),
        range_length: 0,
        text:         text.as_str().into(),
      }
    })
    .collect();
  let event = DocumentChangeEvent::new(buffer.text().clone(), content_changes);

  let mut workspace = Workspace::new();
  let index = workspace.open(buffer);
  let runs = TriggerFilter::new(config).on_did_change_text_document(&event, &mut workspace);
  log::info!("expander ran {runs} time(s)");

  let buffer = workspace
    .buffer(index)
    .context("buffer disappeared from the workspace")?
    .clone();
  for selection in buffer.selections() {
    log::info!("selection {}", describe(selection));
  }
  Ok(buffer)
}

/// 1-based `LINE:COL-LINE:COL`, the way selections are given on the command
/// line.
fn describe(selection: &Selection) -> String {
  let one_based = |pos: Position| format!("{}:{}", pos.line + 1, pos.character + 1);
  format!("{}-{}", one_based(selection.anchor), one_based(selection.active))
}

#[cfg(test)]
mod test {
  use std::path::PathBuf;

  use super::*;
  use crate::cli::DEFAULT_CHANGE;

  fn options(selections: Vec<Selection>, changes: &[&str]) -> CliOptions {
    CliOptions {
      verbosity: 0,
      log_file: None,
      config_file: None,
      file: PathBuf::from("page.html"),
      selections,
      changes: changes.iter().map(|change| change.to_string()).collect(),
      in_place: false,
    }
  }

  fn sel(start: usize, end: usize) -> Selection {
    Selection::new(Position::new(0, start), Position::new(0, end))
  }

  #[test]
  fn expands_the_tag_around_the_selection() {
    let options = options(vec![sel(2, 6)], &[DEFAULT_CHANGE]);
    let buffer = run(&options, SpacerConfig::default(), "x{{name}}y").unwrap();
    assert_eq!(buffer.to_string(), "x{{ name }}y");
    assert_eq!(describe(&buffer.selections()[0]), "1:5-1:9");
  }

  #[test]
  fn non_trigger_changes_leave_the_file_alone() {
    let options = options(vec![sel(2, 6)], &["}", "x"]);
    let buffer = run(&options, SpacerConfig::default(), "x{{name}}y").unwrap();
    assert_eq!(buffer.to_string(), "x{{name}}y");
  }

  #[test]
  fn disabled_config_leaves_the_file_alone() {
    let config = SpacerConfig {
      enabled: false,
      ..Default::default()
    };
    let options = options(vec![sel(2, 6)], &[DEFAULT_CHANGE]);
    let buffer = run(&options, config, "x{{name}}y").unwrap();
    assert_eq!(buffer.to_string(), "x{{name}}y");
  }

  #[test]
  fn config_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "enabled = false\n").unwrap();
    assert!(!SpacerConfig::load(&path).unwrap().enabled);

    fs::write(&path, "enabled = \"yes\"\n").unwrap();
    assert!(SpacerConfig::load(&path).is_err());
  }
}

use std::path::Path;

use anyhow::Result;
use log::LevelFilter;

pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
  match verbosity {
    0 => LevelFilter::Warn,
    1 => LevelFilter::Info,
    2 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  }
}

/// Route log records, including the ones `tracing` forwards from the
/// libraries, to stderr or to `log_file`.
pub fn setup_logging(verbosity: u8, log_file: Option<&Path>) -> Result<()> {
  let base = fern::Dispatch::new()
    .level(level_for_verbosity(verbosity))
    .format(|out, message, record| {
      out.finish(format_args!(
        "{} {} [{}] {}",
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        record.target(),
        record.level(),
        message
      ))
    });

  let base = match log_file {
    Some(path) => base.chain(fern::log_file(path)?),
    None => base.chain(std::io::stderr()),
  };
  base.apply()?;

  Ok(())
}

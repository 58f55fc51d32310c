use smartstring::{LazyCompact, SmartString};

pub mod buffer;
pub mod config;
pub mod expansion;
pub mod history;
pub mod host;
pub mod snippet;
pub mod spacer;
pub mod tag;
pub mod transaction;
pub mod trigger;

pub use config::SpacerConfig;
pub use spacer::Spacer;
pub use tag::TagType;
pub use trigger::{
  ContentChange,
  DocumentChangeEvent,
  TriggerFilter,
};

pub type Tendril = SmartString<LazyCompact>;

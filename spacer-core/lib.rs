pub mod document;
pub mod line_ending;
pub mod position;

pub use document::TextDocument;
pub use position::{
  Position,
  Range,
  Selection,
};

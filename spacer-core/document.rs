//! Read access to document text by line/character range.
//!
//! Positions are validated before they are used: a line past the end of the
//! document clamps to the document end, and a character past the end of its
//! line clamps to the line end (line ending excluded). Extracting text
//! therefore never fails, it only gets shorter.

use ropey::{
  Rope,
  RopeSlice,
};

use crate::{
  line_ending::line_end_char_index,
  position::{
    Position,
    Range,
  },
};

/// The read side of a host document.
pub trait TextDocument {
  /// Text covered by `range` after both bounds are validated.
  fn text_in_range(&self, range: Range) -> String;

  fn line_count(&self) -> usize;

  /// Length of `line` in chars, not counting its line ending. Lines past the
  /// end of the document have length 0.
  fn line_len(&self, line: usize) -> usize;

  fn validate_position(&self, pos: Position) -> Position {
    let last = self.line_count().saturating_sub(1);
    if pos.line > last {
      return Position::new(last, self.line_len(last));
    }
    Position::new(pos.line, pos.character.min(self.line_len(pos.line)))
  }
}

impl TextDocument for Rope {
  fn text_in_range(&self, range: Range) -> String {
    self.slice(..).text_in_range(range)
  }

  fn line_count(&self) -> usize {
    self.len_lines()
  }

  fn line_len(&self, line: usize) -> usize {
    self.slice(..).line_len(line)
  }
}

impl TextDocument for RopeSlice<'_> {
  fn text_in_range(&self, range: Range) -> String {
    let from = char_idx_at_position(*self, range.start);
    let to = char_idx_at_position(*self, range.end).max(from);
    self.slice(from..to).to_string()
  }

  fn line_count(&self) -> usize {
    self.len_lines()
  }

  fn line_len(&self, line: usize) -> usize {
    if line >= self.len_lines() {
      return 0;
    }
    line_end_char_index(self, line) - self.line_to_char(line)
  }
}

/// Convert a validated [`Position`] to a char index into `text`.
pub fn char_idx_at_position(text: RopeSlice, pos: Position) -> usize {
  let pos = text.validate_position(pos);
  text.line_to_char(pos.line) + pos.character
}

/// Converts a char index into a [`Position`]. Indices past the end of the
/// text map to the end of the document.
pub fn position_at_char_idx(text: RopeSlice, idx: usize) -> Position {
  let idx = idx.min(text.len_chars());
  let line = text.char_to_line(idx);
  Position::new(line, idx - text.line_to_char(line))
}

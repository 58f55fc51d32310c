//! Line/character coordinates as an editor host reports them.
//!
//! Everything here is 0-indexed and measured in `char`s. [`Position`] is a
//! single point, [`Range`] an ordered span, and [`Selection`] a possibly
//! reversed span with a caret (`active`) end.
//!
//! ```text
//! line 0: "x{{name}}y"
//!            ^   ^
//!            |   end   = (0, 6)
//!            start     = (0, 2)
//! ```

use std::fmt;

/// A point in a document: 0-indexed line and character within that line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
  pub line:      usize,
  pub character: usize,
}

impl Position {
  pub const fn new(line: usize, character: usize) -> Self {
    Self { line, character }
  }

  pub const fn zero() -> Self {
    Self {
      line:      0,
      character: 0,
    }
  }

  /// Shifts the character on the same line. Returns `None` if the result would
  /// fall before column 0.
  pub fn translate(self, delta: isize) -> Option<Self> {
    let character = self.character.checked_add_signed(delta)?;
    Some(Self { character, ..self })
  }

  /// Like [`Position::translate`] but stops at column 0.
  pub fn saturating_translate(self, delta: isize) -> Self {
    self.translate(delta).unwrap_or(Self {
      character: 0,
      ..self
    })
  }
}

impl From<(usize, usize)> for Position {
  fn from((line, character): (usize, usize)) -> Self {
    Position::new(line, character)
  }
}

impl fmt::Display for Position {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.line, self.character)
  }
}

/// An ordered span between two positions. `start <= end` always holds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Range {
  pub start: Position,
  pub end:   Position,
}

impl Range {
  /// Builds a range, swapping the bounds when they are given in reverse.
  pub fn new(a: Position, b: Position) -> Self {
    if a <= b {
      Self { start: a, end: b }
    } else {
      Self { start: b, end: a }
    }
  }

  pub fn point(pos: Position) -> Self {
    Self {
      start: pos,
      end:   pos,
    }
  }

  pub fn from_coords(
    start_line: usize,
    start_character: usize,
    end_line: usize,
    end_character: usize,
  ) -> Self {
    Self::new(
      Position::new(start_line, start_character),
      Position::new(end_line, end_character),
    )
  }

  pub fn is_empty(&self) -> bool {
    self.start == self.end
  }

  pub fn is_single_line(&self) -> bool {
    self.start.line == self.end.line
  }

  /// Both bounds are inclusive.
  pub fn contains(&self, pos: Position) -> bool {
    self.start <= pos && pos <= self.end
  }

  /// Whether the two ranges share more than a touching boundary.
  pub fn overlaps(&self, other: &Range) -> bool {
    self.start < other.end && other.start < self.end
  }
}

impl fmt::Display for Range {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}", self.start, self.end)
  }
}

/// A cursor selection. `anchor` stays put while `active` follows the caret, so
/// a selection made right-to-left has `active < anchor`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
  pub anchor: Position,
  pub active: Position,
}

impl Selection {
  pub fn new(anchor: Position, active: Position) -> Self {
    Self { anchor, active }
  }

  /// An empty selection: just a caret.
  pub fn caret(pos: Position) -> Self {
    Self {
      anchor: pos,
      active: pos,
    }
  }

  pub fn start(&self) -> Position {
    self.anchor.min(self.active)
  }

  pub fn end(&self) -> Position {
    self.anchor.max(self.active)
  }

  pub fn is_empty(&self) -> bool {
    self.anchor == self.active
  }

  pub fn is_reversed(&self) -> bool {
    self.active < self.anchor
  }

  pub fn range(&self) -> Range {
    Range::new(self.anchor, self.active)
  }
}

impl From<Range> for Selection {
  fn from(range: Range) -> Self {
    Self::new(range.start, range.end)
  }
}

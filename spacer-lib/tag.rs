//! Tag classification around a selection.
//!
//! A selection is classified by looking at a handful of characters next to
//! it, never at the whole line:
//!
//! ```text
//! field         window (relative to the selection)
//! first_char    [start+0, start+1)
//! two_before    [start-1, start+1)
//! three_before  [start-2, start+1)
//! four_before   [start-3, start+1)
//! five_before   [start-4, start+1)
//! char_after    [end+1,   end+2)
//! two_after     [end+1,   end+3)
//! ```
//!
//! When a window would start before column 0 it starts at the selection
//! instead, so it comes out shorter than its pattern and can't match.
//!
//! Rules, first match wins:
//!
//! | Tag         | Rule                                                      |
//! |-------------|-----------------------------------------------------------|
//! | `double`    | `two_before == "{{"`, `first_char != " "`, `two_after != "--"` |
//! | `triple`    | `four_before == "{{ {"`, `first_char != " "`              |
//! | `unescaped` | `three_before == "{!!"`, `first_char != " "`              |
//! | `comment`   | `five_before == "{{ --"`, `first_char == "-"`             |
//!
//! A leading space means the tag was already spaced out, which keeps
//! expansion from firing twice on the same tag. The `two_after` lookahead keeps
//! the opening of a `{{--` comment from being taken for a double tag.

use std::{
  fmt,
  str::FromStr,
};

use serde::{
  Deserialize,
  Serialize,
};
use spacer_core::{
  Position,
  Range,
  Selection,
  TextDocument,
};
use thiserror::Error;

const DOUBLE_OPEN: &str = "{{";
const TRIPLE_OPEN: &str = "{{ {";
const UNESCAPED_OPEN: &str = "{!!";
const COMMENT_OPEN: &str = "{{ --";
const COMMENT_DASHES: &str = "--";
const SPACE: &str = " ";
const DASH: &str = "-";

/// The tag grammars a selection can sit in. "No tag" is `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
  /// `{{ x }}`
  Double,
  /// `{{{ x }}}`
  Triple,
  /// `{!! x !!}`
  Unescaped,
  /// `{{-- x --}}`
  Comment,
}

impl TagType {
  pub const ALL: [TagType; 4] = [
    TagType::Double,
    TagType::Triple,
    TagType::Unescaped,
    TagType::Comment,
  ];

  pub const fn name(self) -> &'static str {
    match self {
      Self::Double => "double",
      Self::Triple => "triple",
      Self::Unescaped => "unescaped",
      Self::Comment => "comment",
    }
  }

  pub(crate) const fn index(self) -> usize {
    match self {
      Self::Double => 0,
      Self::Triple => 1,
      Self::Unescaped => 2,
      Self::Comment => 3,
    }
  }
}

impl fmt::Display for TagType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown tag type '{0}'")]
pub struct UnknownTagType(pub String);

impl FromStr for TagType {
  type Err = UnknownTagType;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    TagType::ALL
      .into_iter()
      .find(|tag| tag.name() == s)
      .ok_or_else(|| UnknownTagType(s.to_string()))
  }
}

/// Range of the text `start_offset..end_offset` chars away from `anchor` on
/// the same line. A start that would land before column 0 is pulled back to
/// the anchor.
pub fn text_at(anchor: Position, start_offset: isize, end_offset: isize) -> Range {
  let start = if anchor.translate(start_offset).is_some() {
    start_offset
  } else {
    0
  };
  Range::new(
    anchor.saturating_translate(start),
    anchor.saturating_translate(end_offset),
  )
}

/// Snapshot of the text immediately around one selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharWindow {
  pub start:        Position,
  pub end:          Position,
  pub first_char:   String,
  pub two_before:   String,
  pub three_before: String,
  pub four_before:  String,
  pub five_before:  String,
  pub char_after:   String,
  pub two_after:    String,
}

impl CharWindow {
  pub fn new<D>(document: &D, selection: &Selection) -> Self
  where
    D: TextDocument + ?Sized,
  {
    let start = selection.start();
    let end = selection.end();
    let at = |anchor: Position, from: isize, to: isize| {
      document.text_in_range(text_at(anchor, from, to))
    };

    Self {
      start,
      end,
      first_char: at(start, 0, 1),
      two_before: at(start, -1, 1),
      three_before: at(start, -2, 1),
      four_before: at(start, -3, 1),
      five_before: at(start, -4, 1),
      char_after: at(end, 1, 2),
      two_after: at(end, 1, 3),
    }
  }

  pub fn classify(&self) -> Option<TagType> {
    let spaced = self.first_char == SPACE;

    if self.two_before == DOUBLE_OPEN && !spaced && self.two_after != COMMENT_DASHES {
      return Some(TagType::Double);
    }

    if self.four_before == TRIPLE_OPEN && !spaced {
      return Some(TagType::Triple);
    }

    if self.three_before == UNESCAPED_OPEN && !spaced {
      return Some(TagType::Unescaped);
    }

    if self.five_before == COMMENT_OPEN && self.first_char == DASH {
      return Some(TagType::Comment);
    }

    None
  }
}

/// Classify the tag (if any) that `selection` sits in.
pub fn tag_type<D>(document: &D, selection: &Selection) -> Option<TagType>
where
  D: TextDocument + ?Sized,
{
  let window = CharWindow::new(document, selection);
  let tag = window.classify();
  tracing::trace!(?window, ?tag, "classified selection");
  tag
}

#[cfg(test)]
mod test {
  use quickcheck::quickcheck;
  use ropey::Rope;

  use super::*;

  fn sel(start: usize, end: usize) -> Selection {
    Selection::new(Position::new(0, start), Position::new(0, end))
  }

  fn classify(text: &str, selection: Selection) -> Option<TagType> {
    tag_type(&Rope::from(text), &selection)
  }

  #[test]
  fn window_slices() {
    let doc = Rope::from("x{{name}}y");
    let window = CharWindow::new(&doc, &sel(2, 6));

    assert_eq!(window.first_char, "{");
    assert_eq!(window.two_before, "{{");
    assert_eq!(window.three_before, "x{{");
    // would start before column 0
    assert_eq!(window.four_before, "{");
    assert_eq!(window.five_before, "{");
    assert_eq!(window.char_after, "}");
    assert_eq!(window.two_after, "}}");
  }

  #[test]
  fn window_start_clamps_to_anchor() {
    // three_before would start at -1, so it starts at the anchor instead.
    assert_eq!(text_at(Position::new(0, 1), -2, 1), Range::from_coords(0, 1, 0, 2));
    assert_eq!(text_at(Position::new(0, 1), -1, 1), Range::from_coords(0, 0, 0, 2));
    assert_eq!(text_at(Position::new(4, 0), -4, 1), Range::from_coords(4, 0, 4, 1));

    let doc = Rope::from("{{ --");
    let window = CharWindow::new(&doc, &sel(1, 1));
    assert_eq!(window.two_before, "{{");
    assert_eq!(window.three_before, "{");
    assert_eq!(window.five_before, "{");
  }

  #[test]
  fn window_after_end_of_line_is_short() {
    let doc = Rope::from("{{ab\nnext");
    let window = CharWindow::new(&doc, &sel(1, 3));
    assert_eq!(window.char_after, "");
    assert_eq!(window.two_after, "");
  }

  #[test]
  fn double() {
    assert_eq!(classify("x{{name}}y", sel(2, 6)), Some(TagType::Double));
    assert_eq!(classify("foo{{bar}}baz", sel(4, 8)), Some(TagType::Double));
    // a bare caret right after typing the second brace
    assert_eq!(classify("{{}", sel(1, 1)), Some(TagType::Double));
  }

  #[test]
  fn triple() {
    assert_eq!(classify("{{ {} }}", sel(3, 3)), Some(TagType::Triple));
    assert_eq!(classify("{{ {name} }}", sel(3, 8)), Some(TagType::Triple));
  }

  #[test]
  fn unescaped() {
    assert_eq!(classify("{!!}", sel(2, 2)), Some(TagType::Unescaped));
    assert_eq!(classify("a {!!x}", sel(4, 5)), Some(TagType::Unescaped));
  }

  #[test]
  fn comment() {
    assert_eq!(classify("{{ --}}", sel(4, 4)), Some(TagType::Comment));
    assert_eq!(
      classify("{{ --comment-- }}", sel(4, 11)),
      Some(TagType::Comment)
    );
  }

  #[test]
  fn comment_opening_is_not_double() {
    // `{{` before the caret but `--` right behind it
    let doc = "{{--}}";
    let window = CharWindow::new(&Rope::from(doc), &sel(1, 1));
    assert_eq!(window.two_before, "{{");
    assert_eq!(window.two_after, "--");
    assert_eq!(classify(doc, sel(1, 1)), None);
  }

  #[test]
  fn spaced_tags_are_left_alone() {
    assert_eq!(classify("{{ name }}", sel(2, 6)), None);
    assert_eq!(classify("{{  {} }}", sel(3, 3)), None);
    assert_eq!(classify("{!! x !!}", sel(3, 4)), None);
  }

  #[test]
  fn nothing_to_classify() {
    assert_eq!(classify("", sel(0, 0)), None);
    assert_eq!(classify("plain text", sel(3, 5)), None);
    assert_eq!(classify("{ {x}", sel(2, 3)), None);
  }

  #[test]
  fn reversed_selection_uses_ordered_bounds() {
    let selection = Selection::new(Position::new(0, 6), Position::new(0, 2));
    assert_eq!(classify("x{{name}}y", selection), Some(TagType::Double));
  }

  #[test]
  fn names_round_trip() {
    for tag in TagType::ALL {
      assert_eq!(tag.name().parse::<TagType>(), Ok(tag));
      assert_eq!(tag.to_string(), tag.name());
    }
    assert_eq!(
      "none".parse::<TagType>(),
      Err(UnknownTagType("none".to_string()))
    );
  }

  fn single_line(text: String) -> String {
    text
      .chars()
      .filter(|ch| !spacer_core::line_ending::char_is_line_ending(*ch))
      .collect()
  }

  quickcheck! {
    fn column_zero_is_never_a_tag(text: String, end: usize) -> bool {
      let text = single_line(text);
      let end = end % (text.chars().count() + 1);
      classify(&text, sel(0, end)).is_none()
    }

    fn leading_space_is_never_expanded(before: String, after: String) -> bool {
      let before = single_line(before);
      let text = format!("{before} {}", single_line(after));
      let at = before.chars().count();
      classify(&text, sel(at, at)).is_none()
    }

    fn double_rule_holds(text: String, at: usize, len: usize) -> bool {
      let text = single_line(text);
      let count = text.chars().count();
      let start = at % (count + 1);
      let end = start + len % (count - start + 1);
      let doc = Rope::from(text.as_str());
      let window = CharWindow::new(&doc, &sel(start, end));
      let expected = window.two_before == "{{" && window.first_char != " " && window.two_after != "--";
      expected == (window.classify() == Some(TagType::Double))
    }
  }
}

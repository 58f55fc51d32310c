//! What gets replaced, and with what, once a tag is recognized.
//!
//! Each [`TagType`] widens the selection by fixed offsets so the range covers
//! the whole tag markup, and owns the snippet template that respaces it:
//!
//! | Tag         | start | end | template                                          |
//! |-------------|-------|-----|---------------------------------------------------|
//! | `double`    | +1    | +1  | ` ${1:${TM_SELECTED_TEXT}} $0`                    |
//! | `triple`    | -1    | +3  | `{ ${1:${TM_SELECTED_TEXT/[ {}]//g}} }$0`         |
//! | `unescaped` | 0     | +1  | `! ${1:${TM_SELECTED_TEXT/[!{} ]/$1/g}} !!$0`     |
//! | `comment`   | -2    | +2  | `-- ${1:${TM_SELECTED_TEXT/[-{} ]/$1/g}} --$0`    |

use smallvec::SmallVec;
use spacer_core::{
  Position,
  Range,
  Selection,
};
use thiserror::Error;

use crate::tag::TagType;

pub const DOUBLE_TEMPLATE: &str = " ${1:${TM_SELECTED_TEXT}} $0";
pub const TRIPLE_TEMPLATE: &str = "{ ${1:${TM_SELECTED_TEXT/[ {}]//g}} }$0";
pub const UNESCAPED_TEMPLATE: &str = "! ${1:${TM_SELECTED_TEXT/[!{} ]/$1/g}} !!$0";
pub const COMMENT_TEMPLATE: &str = "-- ${1:${TM_SELECTED_TEXT/[-{} ]/$1/g}} --$0";

pub type Ranges = SmallVec<[Range; 4]>;

pub type Result<T> = std::result::Result<T, ExpansionError>;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExpansionError {
  #[error("expansion request for {tag_type} tags has no ranges")]
  NoRanges { tag_type: TagType },
  #[error("{tag_type} range for selection starting at {start} would begin before column 0")]
  StartBeforeLine { tag_type: TagType, start: Position },
}

impl TagType {
  /// Character offsets applied to the selection's (start, end).
  pub const fn offsets(self) -> (isize, isize) {
    match self {
      Self::Double => (1, 1),
      Self::Triple => (-1, 3),
      Self::Unescaped => (0, 1),
      Self::Comment => (-2, 2),
    }
  }

  pub const fn template(self) -> &'static str {
    match self {
      Self::Double => DOUBLE_TEMPLATE,
      Self::Triple => TRIPLE_TEMPLATE,
      Self::Unescaped => UNESCAPED_TEMPLATE,
      Self::Comment => COMMENT_TEMPLATE,
    }
  }

  pub const fn insert_options(self) -> InsertOptions {
    match self {
      Self::Comment => InsertOptions {
        undo_stop_before: false,
        undo_stop_after:  true,
      },
      _ => InsertOptions::DEFAULT,
    }
  }
}

/// The span of markup around `selection` that a `tag_type` expansion
/// replaces.
pub fn range_for_tag_type(selection: &Selection, tag_type: TagType) -> Result<Range> {
  let (start_offset, end_offset) = tag_type.offsets();
  let start = selection.start();
  let end = selection.end();

  let out_of_line = || ExpansionError::StartBeforeLine { tag_type, start };
  let from = start.translate(start_offset).ok_or_else(out_of_line)?;
  let to = end.translate(end_offset).ok_or_else(out_of_line)?;

  Ok(Range::new(from, to))
}

/// Undo boundaries around an insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOptions {
  pub undo_stop_before: bool,
  pub undo_stop_after:  bool,
}

impl InsertOptions {
  pub const DEFAULT: Self = Self {
    undo_stop_before: true,
    undo_stop_after:  true,
  };
}

impl Default for InsertOptions {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// One batched templated insertion: the same template applied at every range
/// at once. All ranges belong to tags of the same type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionRequest {
  tag_type: TagType,
  ranges:   Ranges,
  template: &'static str,
  options:  InsertOptions,
}

impl ExpansionRequest {
  pub fn new<I>(tag_type: TagType, ranges: I) -> Result<Self>
  where
    I: IntoIterator<Item = Range>,
  {
    let ranges: Ranges = ranges.into_iter().collect();
    if ranges.is_empty() {
      return Err(ExpansionError::NoRanges { tag_type });
    }

    Ok(Self {
      tag_type,
      ranges,
      template: tag_type.template(),
      options: tag_type.insert_options(),
    })
  }

  pub fn with_options(mut self, options: InsertOptions) -> Self {
    self.options = options;
    self
  }

  pub fn tag_type(&self) -> TagType {
    self.tag_type
  }

  pub fn ranges(&self) -> &[Range] {
    &self.ranges
  }

  pub fn template(&self) -> &'static str {
    self.template
  }

  pub fn options(&self) -> InsertOptions {
    self.options
  }
}

/// Ranges collected per tag type over one pass across the selections, plus
/// the classification of the last selection seen.
#[derive(Debug, Clone, Default)]
pub struct ExpansionBatches {
  batches: [Ranges; 4],
  last:    Option<TagType>,
}

impl ExpansionBatches {
  pub fn new() -> Self {
    Self::default()
  }

  /// Records how the next selection classified, `None` included, whether or
  /// not a range could be computed for it. Each call replaces the last one.
  pub fn classified(&mut self, tag_type: Option<TagType>) {
    self.last = tag_type;
  }

  pub fn push(&mut self, tag_type: TagType, range: Range) {
    self.batches[tag_type.index()].push(range);
  }

  pub fn ranges(&self, tag_type: TagType) -> &[Range] {
    &self.batches[tag_type.index()]
  }

  /// How the last selection classified. `None` when it sat in no tag, even
  /// if earlier selections did.
  pub fn last_classified(&self) -> Option<TagType> {
    self.last
  }

  pub fn is_empty(&self) -> bool {
    self.batches.iter().all(|batch| batch.is_empty())
  }

  pub fn into_request(mut self, tag_type: TagType) -> Result<ExpansionRequest> {
    let ranges = std::mem::take(&mut self.batches[tag_type.index()]);
    ExpansionRequest::new(tag_type, ranges)
  }
}

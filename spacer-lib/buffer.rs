//! In-memory editor host.
//!
//! A [`Buffer`] is one open document with its selections and undo history.
//! Edits made through [`Buffer::apply_change`] leave the selections where
//! they were, the way a host reports a content change before it has moved
//! the carets. Snippet insertion moves them onto the inserted placeholders.

use std::fmt;

use ropey::Rope;
use spacer_core::{
  Position,
  Range,
  Selection,
  TextDocument,
  document::{
    char_idx_at_position,
    position_at_char_idx,
  },
};

use crate::{
  Tendril,
  expansion::ExpansionRequest,
  history::{
    History,
    State,
  },
  host::{
    EditorHost,
    Result,
    TextEditor,
  },
  snippet::{
    RenderedSnippet,
    SelectedText,
    Snippet,
  },
  transaction::Transaction,
  trigger::ContentChange,
};

#[derive(Debug, Clone)]
pub struct Buffer {
  text:       Rope,
  selections: Vec<Selection>,
  history:    History,
}

impl Default for Buffer {
  fn default() -> Self {
    Self::from_rope(Rope::new())
  }
}

impl Buffer {
  pub fn new(text: &str) -> Self {
    Self::from_rope(Rope::from(text))
  }

  /// A buffer with a single caret at the start of the document.
  pub fn from_rope(text: Rope) -> Self {
    Self {
      text,
      selections: vec![Selection::caret(Position::zero())],
      history: History::new(),
    }
  }

  pub fn text(&self) -> &Rope {
    &self.text
  }

  /// Replace the selections. An empty set leaves a caret at the start of the
  /// document, so there is always at least one.
  pub fn set_selections<I>(&mut self, selections: I)
  where
    I: IntoIterator<Item = Selection>,
  {
    self.selections = selections.into_iter().collect();
    if self.selections.is_empty() {
      self.selections.push(Selection::caret(Position::zero()));
    }
  }

  /// Replace `range` with `text` as one undo step and report the change the
  /// way a host would. Selections are not moved.
  pub fn apply_change(&mut self, range: Range, text: &str) -> Result<ContentChange> {
    let slice = self.text.slice(..);
    let from = char_idx_at_position(slice, range.start);
    let to = char_idx_at_position(slice, range.end).max(from);
    let range = Range::new(
      position_at_char_idx(slice, from),
      position_at_char_idx(slice, to),
    );

    let transaction = Transaction::change(&self.text, [(from, to, Some(Tendril::from(text)))])?;
    let original = self.state();
    transaction.apply(&mut self.text)?;
    self.history.commit(original, true, true);

    tracing::trace!(%range, text, "applied change");
    Ok(ContentChange {
      range,
      range_length: to - from,
      text: Tendril::from(text),
    })
  }

  /// Returns false when there is nothing to undo.
  pub fn undo(&mut self) -> bool {
    let current = self.state();
    match self.history.undo(current) {
      Some(state) => {
        self.restore(state);
        true
      },
      None => false,
    }
  }

  pub fn redo(&mut self) -> bool {
    let current = self.state();
    match self.history.redo(current) {
      Some(state) => {
        self.restore(state);
        true
      },
      None => false,
    }
  }

  pub fn history(&self) -> &History {
    &self.history
  }

  fn state(&self) -> State {
    State {
      doc:        self.text.clone(),
      selections: self.selections.clone(),
    }
  }

  fn restore(&mut self, state: State) {
    self.text = state.doc;
    self.selections = state.selections;
  }
}

impl fmt::Display for Buffer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for chunk in self.text.chunks() {
      f.write_str(chunk)?;
    }
    Ok(())
  }
}

impl TextDocument for Buffer {
  fn text_in_range(&self, range: Range) -> String {
    self.text.text_in_range(range)
  }

  fn line_count(&self) -> usize {
    self.text.line_count()
  }

  fn line_len(&self, line: usize) -> usize {
    self.text.line_len(line)
  }
}

impl TextEditor for Buffer {
  fn selections(&self) -> &[Selection] {
    &self.selections
  }

  fn insert_snippet(&mut self, request: &ExpansionRequest) -> Result<()> {
    let snippet = Snippet::parse(request.template())?;

    let slice = self.text.slice(..);
    let mut edits: Vec<(usize, usize, RenderedSnippet)> = request
      .ranges()
      .iter()
      .map(|range| {
        let from = char_idx_at_position(slice, range.start);
        let to = char_idx_at_position(slice, range.end).max(from);
        let selected = slice.slice(from..to).to_string();
        (from, to, snippet.render(&SelectedText(&selected)))
      })
      .collect();
    edits.sort_by_key(|(from, to, _)| (*from, *to));

    let transaction = Transaction::change(
      &self.text,
      edits
        .iter()
        .map(|(from, to, rendered)| (*from, *to, Some(Tendril::from(rendered.text())))),
    )?;

    let original = self.state();
    transaction.apply(&mut self.text)?;

    // Each snippet starts where its range did, shifted by everything
    // inserted before it.
    let slice = self.text.slice(..);
    let mut shift: isize = 0;
    let mut selections = Vec::with_capacity(edits.len());
    for (from, to, rendered) in &edits {
      let start = from.saturating_add_signed(shift);
      let (anchor, head) = match rendered.first_placeholder() {
        Some(placeholder) => (start + placeholder.start, start + placeholder.end),
        None => {
          let cursor = start + rendered.final_cursor();
          (cursor, cursor)
        },
      };
      selections.push(Selection::new(
        position_at_char_idx(slice, anchor),
        position_at_char_idx(slice, head),
      ));
      shift += rendered.len_chars() as isize - (to - from) as isize;
    }
    self.selections = selections;

    let options = request.options();
    self
      .history
      .commit(original, options.undo_stop_before, options.undo_stop_after);

    tracing::debug!(
      tag_type = %request.tag_type(),
      ranges = edits.len(),
      "inserted snippet"
    );
    Ok(())
  }
}

/// A set of open buffers, at most one of which has focus.
#[derive(Debug, Default)]
pub struct Workspace {
  buffers: Vec<Buffer>,
  active:  Option<usize>,
}

impl Workspace {
  pub fn new() -> Self {
    Self::default()
  }

  /// Open `buffer` and give it focus. Returns its index.
  pub fn open(&mut self, buffer: Buffer) -> usize {
    self.buffers.push(buffer);
    let index = self.buffers.len() - 1;
    self.active = Some(index);
    index
  }

  /// Move focus to buffer `index`, or away from every buffer with `None`.
  /// Indices without a buffer clear the focus.
  pub fn focus(&mut self, index: Option<usize>) {
    self.active = index.filter(|index| *index < self.buffers.len());
  }

  pub fn active(&self) -> Option<usize> {
    self.active
  }

  pub fn buffer(&self, index: usize) -> Option<&Buffer> {
    self.buffers.get(index)
  }

  pub fn buffer_mut(&mut self, index: usize) -> Option<&mut Buffer> {
    self.buffers.get_mut(index)
  }

  pub fn len(&self) -> usize {
    self.buffers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffers.is_empty()
  }
}

impl EditorHost for Workspace {
  type Editor = Buffer;

  fn active_text_editor(&mut self) -> Option<&mut Buffer> {
    let index = self.active?;
    self.buffers.get_mut(index)
  }
}

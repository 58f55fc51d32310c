//! Deciding which document changes wake the expander.
//!
//! Only a change whose inserted text is exactly one of [`TRIGGERS`] counts:
//! a single `{`, `!` or `-`, or `{}` as inserted by editors that auto-close
//! braces. Pastes and longer edits never trigger.

use spacer_core::Range;

use crate::{
  Tendril,
  config::SpacerConfig,
  host::EditorHost,
  spacer::Spacer,
};

pub const TRIGGERS: [&str; 4] = ["{}", "!", "-", "{"];

/// Exact, case-sensitive match against [`TRIGGERS`].
pub fn is_trigger(text: &str) -> bool {
  TRIGGERS.contains(&text)
}

/// One edit inside a change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChange {
  /// The replaced range, in the document as it was before the change.
  pub range:        Range,
  /// Length of the replaced range in chars.
  pub range_length: usize,
  /// The text that was inserted.
  pub text:         Tendril,
}

/// A change notification: the document as it was when the notification was
/// sent, plus what changed in it. The expander never classifies against
/// `document`, since an earlier run for the same notification may already
/// have edited the editor.
#[derive(Debug, Clone)]
pub struct DocumentChangeEvent<D> {
  pub document:        D,
  pub content_changes: Vec<ContentChange>,
}

impl<D> DocumentChangeEvent<D> {
  pub fn new(document: D, content_changes: Vec<ContentChange>) -> Self {
    Self {
      document,
      content_changes,
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct TriggerFilter {
  spacer: Spacer,
}

impl TriggerFilter {
  pub fn new(config: SpacerConfig) -> Self {
    Self {
      spacer: Spacer::new(config),
    }
  }

  pub fn spacer(&self) -> &Spacer {
    &self.spacer
  }

  pub fn matches(&self, change: &ContentChange) -> bool {
    self.spacer.config().enabled && is_trigger(&change.text)
  }

  /// Run the expander once for every triggering change in `event`. Each run
  /// sees the active editor as the previous run left it. Returns how many
  /// times it ran.
  pub fn on_did_change_text_document<D, H>(
    &self,
    event: &DocumentChangeEvent<D>,
    host: &mut H,
  ) -> usize
  where
    H: EditorHost,
  {
    let mut runs = 0;
    for change in event.content_changes.iter().filter(|change| self.matches(change)) {
      tracing::trace!(text = %change.text, range = %change.range, "trigger");
      self.spacer.space(host);
      runs += 1;
    }
    runs
  }
}

#[cfg(test)]
mod test {
  use ropey::Rope;
  use spacer_core::{
    Position,
    Selection,
  };

  use super::*;
  use crate::buffer::{
    Buffer,
    Workspace,
  };

  fn change(text: &str) -> ContentChange {
    ContentChange {
      range:        Range::from_coords(0, 0, 0, 0),
      range_length: 0,
      text:         Tendril::from(text),
    }
  }

  #[test]
  fn trigger_strings() {
    for text in TRIGGERS {
      assert!(is_trigger(text));
    }
    for text in ["", "}", "{{", "--", "!!", " {", "{ }", "a"] {
      assert!(!is_trigger(text), "{text:?}");
    }
  }

  #[test]
  fn runs_once_per_triggering_change() {
    let mut workspace = Workspace::new();
    workspace.open(Buffer::new("plain"));

    let event = DocumentChangeEvent::new(Rope::from("plain"), vec![
      change("{"),
      change("x"),
      change("-"),
      change("{}"),
      change("!!"),
    ]);
    let filter = TriggerFilter::default();
    assert_eq!(filter.on_did_change_text_document(&event, &mut workspace), 3);
  }

  #[test]
  fn disabled_filter_matches_nothing() {
    let filter = TriggerFilter::new(SpacerConfig {
      enabled: false,
      ..Default::default()
    });
    assert!(!filter.matches(&change("{")));

    let mut buffer = Buffer::new("x{{name}}y");
    buffer.set_selections([Selection::new(Position::new(0, 2), Position::new(0, 6))]);
    let document = buffer.text().clone();
    let mut workspace = Workspace::new();
    workspace.open(buffer);

    let event = DocumentChangeEvent::new(document, vec![change("{")]);
    assert_eq!(filter.on_did_change_text_document(&event, &mut workspace), 0);
    assert_eq!(workspace.buffer(0).unwrap().to_string(), "x{{name}}y");
  }
}

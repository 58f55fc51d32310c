use ropey::Rope;
use spacer_core::Selection;

/// A document together with the selections it had.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
  pub doc:        Rope,
  pub selections: Vec<Selection>,
}

/// Linear undo history of whole-document snapshots.
///
/// Every undo step stores the state from before the step. Ropes share their
/// nodes, so keeping snapshots around is cheap. A step committed without an
/// undo stop before it is folded into the step before it: undoing it also
/// undoes whatever came right before.
#[derive(Debug, Default, Clone)]
pub struct History {
  undo:       Vec<State>,
  redo:       Vec<State>,
  /// The last step asked for no stop after it.
  merge_next: bool,
}

impl History {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record an edit that turned `original` into the current state.
  pub fn commit(&mut self, original: State, stop_before: bool, stop_after: bool) {
    let merge = (!stop_before || self.merge_next) && !self.undo.is_empty();
    if !merge {
      self.undo.push(original);
    }
    self.redo.clear();
    self.merge_next = !stop_after;
  }

  /// Step back from `current`, returning the state to restore.
  pub fn undo(&mut self, current: State) -> Option<State> {
    let previous = self.undo.pop()?;
    self.redo.push(current);
    self.merge_next = false;
    Some(previous)
  }

  pub fn redo(&mut self, current: State) -> Option<State> {
    let next = self.redo.pop()?;
    self.undo.push(current);
    self.merge_next = false;
    Some(next)
  }

  pub fn can_undo(&self) -> bool {
    !self.undo.is_empty()
  }

  pub fn can_redo(&self) -> bool {
    !self.redo.is_empty()
  }

  /// Number of undo steps.
  pub fn len(&self) -> usize {
    self.undo.len()
  }

  pub fn is_empty(&self) -> bool {
    self.undo.is_empty()
  }
}

//! The editor the expander runs inside.
//!
//! The expander only needs three things from a host: the current text and
//! selections of the active editor, and a way to insert a templated snippet
//! over a batch of ranges. Anything that implements these traits can drive it; [`Buffer`]
//! and [`Workspace`] are the in-memory implementation.
//!
//! [`Buffer`]: crate::buffer::Buffer
//! [`Workspace`]: crate::buffer::Workspace

use spacer_core::{
  Selection,
  TextDocument,
};
use thiserror::Error;

use crate::{
  expansion::ExpansionRequest,
  snippet::SnippetError,
  transaction::TransactionError,
};

pub type Result<T> = std::result::Result<T, HostError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HostError {
  #[error("invalid snippet template: {0}")]
  Snippet(#[from] SnippetError),
  #[error("failed to apply edit: {0}")]
  Transaction(#[from] TransactionError),
}

/// An editor showing one document. Reading it as a [`TextDocument`] gives the
/// document's current text, including edits made by earlier insertions.
pub trait TextEditor: TextDocument {
  /// Current selections, in the order the host reports them.
  fn selections(&self) -> &[Selection];

  /// Replace every range of `request` with its rendered template, as one
  /// edit.
  fn insert_snippet(&mut self, request: &ExpansionRequest) -> Result<()>;
}

pub trait EditorHost {
  type Editor: TextEditor;

  /// The editor with focus, if there is one.
  fn active_text_editor(&mut self) -> Option<&mut Self::Editor>;
}

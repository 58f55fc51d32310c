//! The tag expander.
//!
//! On every trigger the expander classifies each selection of the active
//! editor against that editor's current text, collects the range each
//! classified selection would replace, and issues at most one batched snippet
//! insertion. Only the type of the last selection decides what expands, and
//! only `double` tags are expanded.

use spacer_core::{
  Range,
  Selection,
  TextDocument,
};

use crate::{
  config::SpacerConfig,
  expansion::{
    self,
    ExpansionBatches,
    ExpansionRequest,
    InsertOptions,
  },
  host::{
    EditorHost,
    TextEditor,
  },
  tag::{
    self,
    TagType,
  },
};

/// Tag types `space` actually expands.
const EXPANDED: [TagType; 1] = [TagType::Double];

#[derive(Debug, Clone, Default)]
pub struct Spacer {
  config: SpacerConfig,
}

impl Spacer {
  pub fn new(config: SpacerConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &SpacerConfig {
    &self.config
  }

  pub fn tag_type<D>(&self, document: &D, selection: &Selection) -> Option<TagType>
  where
    D: TextDocument + ?Sized,
  {
    tag::tag_type(document, selection)
  }

  pub fn range_for_tag_type(
    &self,
    selection: &Selection,
    tag_type: TagType,
  ) -> expansion::Result<Range> {
    expansion::range_for_tag_type(selection, tag_type)
  }

  /// The insertion `space` would issue for `selections`, if any.
  pub fn plan<D>(&self, document: &D, selections: &[Selection]) -> Option<ExpansionRequest>
  where
    D: TextDocument + ?Sized,
  {
    let mut batches = ExpansionBatches::new();

    for selection in selections {
      let classified = self.tag_type(document, selection);
      batches.classified(classified);
      let Some(tag_type) = classified else {
        continue;
      };

      match self.range_for_tag_type(selection, tag_type) {
        Ok(range) => batches.push(tag_type, range),
        Err(err) => tracing::trace!(%err, "skipping selection"),
      }
    }

    let Some(tag_type) = batches.last_classified() else {
      tracing::trace!("last selection is in no tag");
      return None;
    };
    if !EXPANDED.contains(&tag_type) {
      tracing::debug!(%tag_type, "not expanding");
      return None;
    }

    let request = match batches.into_request(tag_type) {
      Ok(request) => request,
      Err(err) => {
        tracing::debug!(%err, "nothing to expand");
        return None;
      },
    };

    let options = InsertOptions {
      undo_stop_before: self.config.insert.undo_stop_before,
      ..request.options()
    };
    tracing::debug!(%tag_type, ranges = request.ranges().len(), "planned expansion");
    Some(request.with_options(options))
  }

  /// Expand the tags around the active editor's selections, reading the
  /// editor's text as it is now. Returns whether a snippet was inserted.
  /// Insertion failures are logged, never returned.
  pub fn space<H>(&self, host: &mut H) -> bool
  where
    H: EditorHost,
  {
    let Some(editor) = host.active_text_editor() else {
      tracing::trace!("no active editor");
      return false;
    };

    let Some(request) = self.plan(&*editor, editor.selections()) else {
      return false;
    };

    match editor.insert_snippet(&request) {
      Ok(()) => true,
      Err(err) => {
        tracing::warn!(%err, tag_type = %request.tag_type(), "failed to expand tag");
        false
      },
    }
  }
}

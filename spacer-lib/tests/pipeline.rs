use spacer_core::{
  Position,
  Range,
  Selection,
};
use spacer_lib::{
  DocumentChangeEvent,
  SpacerConfig,
  TriggerFilter,
  buffer::{
    Buffer,
    Workspace,
  },
  config::InsertConfig,
  host::TextEditor,
};

fn sel(line: usize, start: usize, end: usize) -> Selection {
  Selection::new(Position::new(line, start), Position::new(line, end))
}

fn point(line: usize, character: usize) -> Range {
  Range::point(Position::new(line, character))
}

/// Apply `edits` to the active buffer and deliver them as one change event.
fn type_into(
  workspace: &mut Workspace,
  filter: &TriggerFilter,
  edits: &[(Range, &str)],
) -> usize {
  let index = workspace.active().unwrap();
  let buffer = workspace.buffer_mut(index).unwrap();
  let changes = edits
    .iter()
    .map(|(range, text)| buffer.apply_change(*range, text).unwrap())
    .collect();
  let event = DocumentChangeEvent::new(buffer.text().clone(), changes);
  filter.on_did_change_text_document(&event, workspace)
}

fn active(workspace: &Workspace) -> &Buffer {
  workspace.buffer(workspace.active().unwrap()).unwrap()
}

#[test]
fn typing_a_brace_spaces_the_tag() {
  let mut workspace = Workspace::new();
  let mut buffer = Buffer::new("x{name}y");
  buffer.set_selections([sel(0, 2, 6)]);
  workspace.open(buffer);

  let filter = TriggerFilter::default();
  let runs = type_into(&mut workspace, &filter, &[(point(0, 2), "{"), (point(0, 8), "}")]);

  assert_eq!(runs, 1);
  let buffer = active(&workspace);
  assert_eq!(buffer.to_string(), "x{{ name }}y");
  assert_eq!(buffer.selections(), &[sel(0, 4, 8)]);
}

#[test]
fn every_cursor_is_expanded_in_one_edit() {
  let mut workspace = Workspace::new();
  let mut buffer = Buffer::new("{{ab}} {{cd}}");
  buffer.set_selections([sel(0, 1, 3), sel(0, 8, 10)]);
  workspace.open(buffer);

  let filter = TriggerFilter::default();
  let event = DocumentChangeEvent::new(active(&workspace).text().clone(), vec![
    spacer_lib::ContentChange {
      range:        point(0, 1),
      range_length: 0,
      text:         "{}".into(),
    },
  ]);
  assert_eq!(filter.on_did_change_text_document(&event, &mut workspace), 1);

  let buffer = active(&workspace);
  assert_eq!(buffer.to_string(), "{{ ab }} {{ cd }}");
  assert_eq!(buffer.selections(), &[sel(0, 3, 5), sel(0, 12, 14)]);
  assert_eq!(buffer.history().len(), 1);
}

#[test]
fn tags_on_other_lines() {
  let mut workspace = Workspace::new();
  let mut buffer = Buffer::new("<p>\r\n  {{title}}\r\n</p>\r\n");
  buffer.set_selections([sel(1, 3, 8)]);
  workspace.open(buffer);

  let runs = type_into(&mut workspace, &TriggerFilter::default(), &[(
    Range::from_coords(1, 2, 1, 2),
    "-",
  )]);
  assert_eq!(runs, 1);
  // the `-` lands before the tag, so the selection no longer sits in one
  assert_eq!(active(&workspace).to_string(), "<p>\r\n  -{{title}}\r\n</p>\r\n");

  let mut workspace = Workspace::new();
  let mut buffer = Buffer::new("<p>\r\n  {{title}}\r\n</p>\r\n");
  buffer.set_selections([sel(1, 3, 8)]);
  workspace.open(buffer);
  let event = DocumentChangeEvent::new(active(&workspace).text().clone(), vec![
    spacer_lib::ContentChange {
      range:        point(1, 3),
      range_length: 0,
      text:         "{".into(),
    },
  ]);
  TriggerFilter::default().on_did_change_text_document(&event, &mut workspace);
  assert_eq!(active(&workspace).to_string(), "<p>\r\n  {{ title }}\r\n</p>\r\n");
}

#[test]
fn last_selection_picks_the_type() {
  let text = "{{a}}\n{{ {b} }}";
  let double = sel(0, 1, 2);
  let triple = sel(1, 3, 4);

  let run = |selections: [Selection; 2]| {
    let mut workspace = Workspace::new();
    let mut buffer = Buffer::new(text);
    buffer.set_selections(selections);
    workspace.open(buffer);
    type_into(&mut workspace, &TriggerFilter::default(), &[(point(0, 5), "!")]);
    active(&workspace).to_string()
  };

  // `!` typed at the end of the first line
  assert_eq!(run([double, triple]), "{{a}}!\n{{ {b} }}");
  assert_eq!(run([triple, double]), "{{ a }}!\n{{ {b} }}");
}

#[test]
fn trailing_plain_selection_expands_nothing() {
  let double = sel(0, 1, 2);
  let plain = sel(0, 7, 9);

  let run = |selections: [Selection; 2]| {
    let mut workspace = Workspace::new();
    let mut buffer = Buffer::new("{{a}} plain");
    buffer.set_selections(selections);
    workspace.open(buffer);
    type_into(&mut workspace, &TriggerFilter::default(), &[(point(0, 11), "!")]);
    active(&workspace).to_string()
  };

  assert_eq!(run([double, plain]), "{{a}} plain!");
  assert_eq!(run([plain, double]), "{{ a }} plain!");
}

#[test]
fn second_trigger_sees_the_first_expansion() {
  let mut workspace = Workspace::new();
  let mut buffer = Buffer::new("{{{{}}");
  buffer.set_selections([Selection::caret(Position::new(0, 1))]);
  let index = workspace.open(buffer);

  let brace = || {
    spacer_lib::ContentChange {
      range:        point(0, 1),
      range_length: 0,
      text:         "{".into(),
    }
  };
  let document = active(&workspace).text().clone();
  let event = DocumentChangeEvent::new(document, vec![brace(), brace()]);
  let runs = TriggerFilter::default().on_did_change_text_document(&event, &mut workspace);

  assert_eq!(runs, 2);
  let buffer = workspace.buffer(index).unwrap();
  assert_eq!(buffer.to_string(), "{{  {{}}");
  assert_eq!(buffer.selections(), &[Selection::caret(Position::new(0, 3))]);
  assert_eq!(buffer.history().len(), 1);
}

#[test]
fn nothing_happens_without_an_active_editor() {
  let mut workspace = Workspace::new();
  let mut buffer = Buffer::new("x{{name}}y");
  buffer.set_selections([sel(0, 2, 6)]);
  let index = workspace.open(buffer);
  workspace.focus(None);

  let document = workspace.buffer(index).unwrap().text().clone();
  let event = DocumentChangeEvent::new(document, vec![spacer_lib::ContentChange {
    range:        point(0, 2),
    range_length: 0,
    text:         "{".into(),
  }]);
  assert_eq!(
    TriggerFilter::default().on_did_change_text_document(&event, &mut workspace),
    1
  );
  assert_eq!(workspace.buffer(index).unwrap().to_string(), "x{{name}}y");
}

#[test]
fn undo_reverts_the_expansion() {
  let mut workspace = Workspace::new();
  let mut buffer = Buffer::new("x{name}y");
  buffer.set_selections([sel(0, 2, 6)]);
  let index = workspace.open(buffer);

  type_into(&mut workspace, &TriggerFilter::default(), &[(point(0, 2), "{")]);
  let buffer = workspace.buffer_mut(index).unwrap();
  assert_eq!(buffer.to_string(), "x{{ name }y");

  assert!(buffer.undo());
  assert_eq!(buffer.to_string(), "x{{name}y");
  assert!(buffer.undo());
  assert_eq!(buffer.to_string(), "x{name}y");
}

#[test]
fn undo_without_stop_reverts_the_keystroke_too() {
  let filter = TriggerFilter::new(SpacerConfig {
    insert: InsertConfig {
      undo_stop_before: false,
    },
    ..Default::default()
  });

  let mut workspace = Workspace::new();
  let mut buffer = Buffer::new("x{name}y");
  buffer.set_selections([sel(0, 2, 6)]);
  let index = workspace.open(buffer);

  type_into(&mut workspace, &filter, &[(point(0, 2), "{")]);
  let buffer = workspace.buffer_mut(index).unwrap();
  assert_eq!(buffer.to_string(), "x{{ name }y");

  assert!(buffer.undo());
  assert_eq!(buffer.to_string(), "x{name}y");
  assert!(!buffer.undo());
}

#[test]
fn already_spaced_tags_are_stable() {
  let mut workspace = Workspace::new();
  let mut buffer = Buffer::new("{{ name }}");
  buffer.set_selections([sel(0, 2, 8)]);
  workspace.open(buffer);

  type_into(&mut workspace, &TriggerFilter::default(), &[(point(0, 10), "{")]);
  assert_eq!(active(&workspace).to_string(), "{{ name }}{");
}

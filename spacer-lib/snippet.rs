//! Snippet templates.
//!
//! A small subset of the TextMate snippet syntax, enough for the tag
//! templates:
//!
//! - `$1`, `${1}`, `${1:default}`: tabstops, `$0` is the final cursor
//! - `$NAME`, `${NAME}`, `${NAME:default}`: variables
//! - `${NAME/regex/format/flags}`: a variable run through a regex transform,
//!   where `format` may reference groups as `$1` or `${1}`
//! - `\$`, `\}` and `\\` escape
//!
//! Rendering flattens a [`Snippet`] to plain text and remembers where every
//! tabstop landed, in chars from the start of the rendered text.

use std::{
  borrow::Cow,
  ops::Range as CharRange,
};

use regex::{
  Regex,
  RegexBuilder,
};
use thiserror::Error;

use crate::Tendril;

/// Variable holding the text the snippet replaces.
pub const SELECTED_TEXT: &str = "TM_SELECTED_TEXT";
/// Index of the tabstop where the cursor ends up.
pub const FINAL_TABSTOP: usize = 0;

pub type Result<T> = std::result::Result<T, SnippetError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SnippetError {
  #[error("malformed placeholder at offset {offset}")]
  Malformed { offset: usize },
  #[error("invalid transform regex '{pattern}': {source}")]
  InvalidRegex {
    pattern: String,
    source:  regex::Error,
  },
  #[error("unknown transform flag '{flag}'")]
  UnknownFlag { flag: char },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SnippetElement {
  Text(Tendril),
  Tabstop {
    index:   usize,
    default: Vec<SnippetElement>,
  },
  Variable {
    name:      Tendril,
    default:   Vec<SnippetElement>,
    transform: Option<Transform>,
  },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatItem {
  Text(Tendril),
  Group(usize),
}

#[derive(Debug, Clone)]
pub struct Transform {
  regex:  Regex,
  format: Vec<FormatItem>,
  global: bool,
}

impl PartialEq for Transform {
  fn eq(&self, other: &Self) -> bool {
    self.regex.as_str() == other.regex.as_str()
      && self.format == other.format
      && self.global == other.global
  }
}

impl Transform {
  pub fn apply(&self, input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;

    for caps in self.regex.captures_iter(input) {
      let Some(whole) = caps.get(0) else {
        continue;
      };
      out.push_str(&input[last..whole.start()]);
      for item in &self.format {
        match item {
          FormatItem::Text(text) => out.push_str(text),
          // groups that did not participate expand to nothing
          FormatItem::Group(group) => {
            if let Some(m) = caps.get(*group) {
              out.push_str(m.as_str());
            }
          },
        }
      }
      last = whole.end();
      if !self.global {
        break;
      }
    }

    out.push_str(&input[last..]);
    out
  }
}

/// Resolves snippet variables by name.
pub trait VariableResolver {
  /// `None` means the variable is unknown to this resolver.
  fn resolve(&self, name: &str) -> Option<Cow<'_, str>>;
}

/// Resolves [`SELECTED_TEXT`] and nothing else.
#[derive(Debug, Clone, Copy)]
pub struct SelectedText<'a>(pub &'a str);

impl VariableResolver for SelectedText<'_> {
  fn resolve(&self, name: &str) -> Option<Cow<'_, str>> {
    (name == SELECTED_TEXT).then_some(Cow::Borrowed(self.0))
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
  elements: Vec<SnippetElement>,
}

impl Snippet {
  pub fn parse(source: &str) -> Result<Self> {
    let mut parser = Parser {
      chars: source.chars().collect(),
      pos:   0,
    };
    let elements = parser.elements(false)?;
    Ok(Self { elements })
  }

  pub fn elements(&self) -> &[SnippetElement] {
    &self.elements
  }

  pub fn render(&self, resolver: &dyn VariableResolver) -> RenderedSnippet {
    let mut out = RenderedSnippet::default();
    render_elements(&self.elements, resolver, &mut out);
    out
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedSnippet {
  text:      String,
  len_chars: usize,
  tabstops:  Vec<(usize, CharRange<usize>)>,
}

impl RenderedSnippet {
  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn len_chars(&self) -> usize {
    self.len_chars
  }

  /// Char range of the first occurrence of tabstop `index`.
  pub fn tabstop(&self, index: usize) -> Option<CharRange<usize>> {
    self
      .tabstops
      .iter()
      .find(|(i, _)| *i == index)
      .map(|(_, range)| range.clone())
  }

  /// The lowest numbered tabstop other than the final one.
  pub fn first_placeholder(&self) -> Option<CharRange<usize>> {
    self
      .tabstops
      .iter()
      .filter(|(i, _)| *i != FINAL_TABSTOP)
      .min_by_key(|(i, _)| *i)
      .map(|(_, range)| range.clone())
  }

  /// Where the cursor ends up: `$0`, or the end of the text without one.
  pub fn final_cursor(&self) -> usize {
    self
      .tabstop(FINAL_TABSTOP)
      .map(|range| range.start)
      .unwrap_or(self.len_chars)
  }

  fn push_str(&mut self, text: &str) {
    self.text.push_str(text);
    self.len_chars += text.chars().count();
  }
}

fn render_elements(
  elements: &[SnippetElement],
  resolver: &dyn VariableResolver,
  out: &mut RenderedSnippet,
) {
  for element in elements {
    match element {
      SnippetElement::Text(text) => out.push_str(text),
      SnippetElement::Tabstop { index, default } => {
        let start = out.len_chars;
        render_elements(default, resolver, out);
        if !out.tabstops.iter().any(|(i, _)| i == index) {
          out.tabstops.push((*index, start..out.len_chars));
        }
      },
      SnippetElement::Variable {
        name,
        default,
        transform,
      } => match (resolver.resolve(name), transform) {
        (Some(value), Some(transform)) => out.push_str(&transform.apply(&value)),
        (Some(value), None) if !value.is_empty() => out.push_str(&value),
        (Some(_), None) => render_elements(default, resolver, out),
        (None, _) if !default.is_empty() => render_elements(default, resolver, out),
        (None, _) => out.push_str(name),
      },
    }
  }
}

struct Parser {
  chars: Vec<char>,
  pos:   usize,
}

fn is_name_start(ch: char) -> bool {
  ch == '_' || ch.is_ascii_alphabetic()
}

fn is_name_char(ch: char) -> bool {
  ch == '_' || ch.is_ascii_alphanumeric()
}

fn flush_text(elements: &mut Vec<SnippetElement>, text: &mut Tendril) {
  if !text.is_empty() {
    elements.push(SnippetElement::Text(std::mem::take(text)));
  }
}

impl Parser {
  fn peek(&self) -> Option<char> {
    self.chars.get(self.pos).copied()
  }

  fn bump(&mut self) -> Option<char> {
    let ch = self.peek()?;
    self.pos += 1;
    Some(ch)
  }

  fn number(&mut self) -> usize {
    let mut value: usize = 0;
    while let Some(digit) = self.peek().and_then(|ch| ch.to_digit(10)) {
      value = value.saturating_mul(10).saturating_add(digit as usize);
      self.pos += 1;
    }
    value
  }

  fn name(&mut self) -> Tendril {
    let mut name = Tendril::new();
    while let Some(ch) = self.peek().filter(|ch| is_name_char(*ch)) {
      name.push(ch);
      self.pos += 1;
    }
    name
  }

  /// Parses until the end of input, or until an unescaped `}` when `nested`.
  /// The closing brace is left for the caller.
  fn elements(&mut self, nested: bool) -> Result<Vec<SnippetElement>> {
    let mut elements = Vec::new();
    let mut text = Tendril::new();

    while let Some(ch) = self.peek() {
      match ch {
        '}' if nested => break,
        '\\' => {
          self.pos += 1;
          match self.peek() {
            Some(escaped @ ('$' | '}' | '\\')) => {
              text.push(escaped);
              self.pos += 1;
            },
            _ => text.push('\\'),
          }
        },
        '$' => match self.dollar()? {
          Some(element) => {
            flush_text(&mut elements, &mut text);
            elements.push(element);
          },
          None => text.push('$'),
        },
        _ => {
          text.push(ch);
          self.pos += 1;
        },
      }
    }

    flush_text(&mut elements, &mut text);
    Ok(elements)
  }

  /// Called on a `$`. Returns `None` (with the `$` consumed) when it does not
  /// start a tabstop or variable.
  fn dollar(&mut self) -> Result<Option<SnippetElement>> {
    let offset = self.pos;
    self.pos += 1;

    match self.peek() {
      Some(ch) if ch.is_ascii_digit() => {
        Ok(Some(SnippetElement::Tabstop {
          index:   self.number(),
          default: Vec::new(),
        }))
      },
      Some(ch) if is_name_start(ch) => {
        Ok(Some(SnippetElement::Variable {
          name:      self.name(),
          default:   Vec::new(),
          transform: None,
        }))
      },
      Some('{') => {
        self.pos += 1;
        self.braced(offset).map(Some)
      },
      _ => Ok(None),
    }
  }

  fn braced(&mut self, offset: usize) -> Result<SnippetElement> {
    let malformed = SnippetError::Malformed { offset };

    match self.peek() {
      Some(ch) if ch.is_ascii_digit() => {
        let index = self.number();
        let default = match self.bump() {
          Some('}') => Vec::new(),
          Some(':') => self.default(offset)?,
          _ => return Err(malformed),
        };
        Ok(SnippetElement::Tabstop { index, default })
      },
      Some(ch) if is_name_start(ch) => {
        let name = self.name();
        let (default, transform) = match self.bump() {
          Some('}') => (Vec::new(), None),
          Some(':') => (self.default(offset)?, None),
          Some('/') => (Vec::new(), Some(self.transform(offset)?)),
          _ => return Err(malformed),
        };
        Ok(SnippetElement::Variable {
          name,
          default,
          transform,
        })
      },
      _ => Err(malformed),
    }
  }

  fn default(&mut self, offset: usize) -> Result<Vec<SnippetElement>> {
    let default = self.elements(true)?;
    match self.bump() {
      Some('}') => Ok(default),
      _ => Err(SnippetError::Malformed { offset }),
    }
  }

  /// `regex/format/flags}` after the first slash.
  fn transform(&mut self, offset: usize) -> Result<Transform> {
    let pattern = self.regex_source(offset)?;
    let format = self.format(offset)?;

    let mut builder = RegexBuilder::new(&pattern);
    let mut global = false;
    loop {
      match self.bump() {
        Some('}') => break,
        Some('g') => global = true,
        Some('i') => {
          builder.case_insensitive(true);
        },
        Some('m') => {
          builder.multi_line(true);
        },
        Some(flag) => return Err(SnippetError::UnknownFlag { flag }),
        None => return Err(SnippetError::Malformed { offset }),
      }
    }

    let regex = builder
      .build()
      .map_err(|source| SnippetError::InvalidRegex { pattern, source })?;

    Ok(Transform {
      regex,
      format,
      global,
    })
  }

  fn regex_source(&mut self, offset: usize) -> Result<String> {
    let mut pattern = String::new();
    loop {
      match self.bump() {
        Some('/') => return Ok(pattern),
        Some('\\') if self.peek() == Some('/') => {
          pattern.push('/');
          self.pos += 1;
        },
        Some(ch) => pattern.push(ch),
        None => return Err(SnippetError::Malformed { offset }),
      }
    }
  }

  fn format(&mut self, offset: usize) -> Result<Vec<FormatItem>> {
    let mut items = Vec::new();
    let mut text = Tendril::new();
    let flush = |items: &mut Vec<FormatItem>, text: &mut Tendril| {
      if !text.is_empty() {
        items.push(FormatItem::Text(std::mem::take(text)));
      }
    };

    loop {
      match self.bump() {
        Some('/') => break,
        Some('\\') => match self.peek() {
          Some(escaped @ ('/' | '$' | '\\')) => {
            text.push(escaped);
            self.pos += 1;
          },
          _ => text.push('\\'),
        },
        Some('$') => match self.peek() {
          Some(ch) if ch.is_ascii_digit() => {
            flush(&mut items, &mut text);
            items.push(FormatItem::Group(self.number()));
          },
          Some('{') if self.chars.get(self.pos + 1).is_some_and(|ch| ch.is_ascii_digit()) => {
            self.pos += 1;
            let group = self.number();
            if self.bump() != Some('}') {
              return Err(SnippetError::Malformed { offset });
            }
            flush(&mut items, &mut text);
            items.push(FormatItem::Group(group));
          },
          _ => text.push('$'),
        },
        Some(ch) => text.push(ch),
        None => return Err(SnippetError::Malformed { offset }),
      }
    }

    flush(&mut items, &mut text);
    Ok(items)
  }
}

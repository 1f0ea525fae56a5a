use strum::EnumIs;

pub const DEFAULT_FIELD_TEXT: &str = "0";
const MAX_FIELD_LEN: usize = 6;

/// The three time entry fields, in focus order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumIs)]
pub enum Field {
  #[default]
  Hours,
  Minutes,
  Seconds,
}

impl Field {
  pub const ALL: [Field; 3] = [Field::Hours, Field::Minutes, Field::Seconds];

  pub fn next(self) -> Self {
    match self {
      Field::Hours => Field::Minutes,
      Field::Minutes => Field::Seconds,
      Field::Seconds => Field::Hours,
    }
  }

  pub fn prev(self) -> Self {
    match self {
      Field::Hours => Field::Seconds,
      Field::Minutes => Field::Hours,
      Field::Seconds => Field::Minutes,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Field::Hours => "Hours",
      Field::Minutes => "Minutes",
      Field::Seconds => "Seconds",
    }
  }

  pub fn index(self) -> usize {
    self as usize
  }
}

/// A single line text entry that can be disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeField {
  text: String,
  enabled: bool,
}

impl Default for TimeField {
  fn default() -> Self {
    Self { text: DEFAULT_FIELD_TEXT.to_string(), enabled: true }
  }
}

impl TimeField {
  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled
  }

  pub fn set_enabled(&mut self, enabled: bool) {
    self.enabled = enabled;
  }

  pub fn set_text(&mut self, text: &str) {
    self.text = text.to_string();
  }

  pub fn push(&mut self, c: char) {
    if self.enabled && !c.is_control() && self.text.chars().count() < MAX_FIELD_LEN {
      self.text.push(c);
    }
  }

  pub fn backspace(&mut self) {
    if self.enabled {
      self.text.pop();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_field_focus_cycle() {
    assert_eq!(Field::Hours.next(), Field::Minutes);
    assert_eq!(Field::Seconds.next(), Field::Hours);
    assert_eq!(Field::Hours.prev(), Field::Seconds);
    assert_eq!(Field::Minutes.prev(), Field::Hours);
  }

  #[test]
  fn test_default_text() {
    let field = TimeField::default();
    assert_eq!(field.text(), "0");
    assert!(field.is_enabled());
  }

  #[test]
  fn test_edit() {
    let mut field = TimeField::default();
    field.backspace();
    field.push('1');
    field.push('2');
    assert_eq!(field.text(), "12");
    field.push('\n');
    assert_eq!(field.text(), "12");
  }

  #[test]
  fn test_length_limit() {
    let mut field = TimeField::default();
    for c in "1234567890".chars() {
      field.push(c);
    }
    assert_eq!(field.text().len(), MAX_FIELD_LEN);
  }

  #[test]
  fn test_disabled_ignores_edits() {
    let mut field = TimeField::default();
    field.set_enabled(false);
    field.push('5');
    field.backspace();
    assert_eq!(field.text(), "0");
  }
}

use serde::{Deserialize, Serialize};

use crate::emulator::button::LogicalButton;

/// One physical key per logical control. Two controls may share a key; the
/// lookup order below decides which control such a key drives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyBindingSet {
  pub up: String,
  pub down: String,
  pub left: String,
  pub right: String,
  pub a: String,
  pub b: String,
  pub start: String,
  pub select: String,
}

impl Default for KeyBindingSet {
  fn default() -> KeyBindingSet {
    KeyBindingSet {
      up: "w".to_string(),
      left: "a".to_string(),
      down: "s".to_string(),
      right: "d".to_string(),
      a: "j".to_string(),
      b: "k".to_string(),
      start: " ".to_string(),
      select: "b".to_string(),
    }
  }
}

impl KeyBindingSet {
  pub fn button_for_key(&self, key: &str) -> Option<LogicalButton> {
    if self.up == key {
      Some(LogicalButton::DUp)
    } else if self.left == key {
      Some(LogicalButton::DLeft)
    } else if self.right == key {
      Some(LogicalButton::DRight)
    } else if self.down == key {
      Some(LogicalButton::DDown)
    } else if self.a == key {
      Some(LogicalButton::A)
    } else if self.b == key {
      Some(LogicalButton::B)
    } else if self.start == key {
      Some(LogicalButton::Start)
    } else if self.select == key {
      Some(LogicalButton::Select)
    } else {
      None
    }
  }

  /// Applies a partial rebind. Empty fields leave the existing binding
  /// untouched; non-empty fields overwrite, last submission wins.
  pub fn merge(&mut self, update: &BindingUpdate) {
    let fields = [
      (&update.up, &mut self.up),
      (&update.down, &mut self.down),
      (&update.left, &mut self.left),
      (&update.right, &mut self.right),
      (&update.a, &mut self.a),
      (&update.b, &mut self.b),
      (&update.start, &mut self.start),
      (&update.select, &mut self.select),
    ];
    for (submitted, binding) in fields {
      if !submitted.is_empty() {
        *binding = submitted.clone();
      }
    }
  }
}

/// A rebind form submission. Fields the user left blank deserialize to the
/// empty string and are skipped by `merge`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BindingUpdate {
  #[serde(default)]
  pub up: String,
  #[serde(default)]
  pub down: String,
  #[serde(default)]
  pub left: String,
  #[serde(default)]
  pub right: String,
  #[serde(default)]
  pub a: String,
  #[serde(default)]
  pub b: String,
  #[serde(default)]
  pub start: String,
  #[serde(default)]
  pub select: String,
}

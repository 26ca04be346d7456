use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Offset {
  pub x: f64,
  pub y: f64,
}

/// Where the user dragged each on-screen control. `None` means never moved;
/// positioning is purely cosmetic and has no effect on emulation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlLayout {
  pub up_button: Option<Offset>,
  pub down_button: Option<Offset>,
  pub left_button: Option<Offset>,
  pub right_button: Option<Offset>,
  pub start: Option<Offset>,
  pub select: Option<Offset>,
  pub a: Option<Offset>,
  pub b: Option<Offset>,
}

impl ControlLayout {
  pub fn set_offset(&mut self, control: &str, x: f64, y: f64) -> bool {
    match self.slot(control) {
      Some(slot) => {
        *slot = Some(Offset { x, y });
        true
      }
      None => false,
    }
  }

  pub fn offset(&self, control: &str) -> Option<Offset> {
    match control {
      "upButton" => self.up_button,
      "downButton" => self.down_button,
      "leftButton" => self.left_button,
      "rightButton" => self.right_button,
      "start" => self.start,
      "select" => self.select,
      "a" => self.a,
      "b" => self.b,
      _ => None,
    }
  }

  fn slot(&mut self, control: &str) -> Option<&mut Option<Offset>> {
    match control {
      "upButton" => Some(&mut self.up_button),
      "downButton" => Some(&mut self.down_button),
      "leftButton" => Some(&mut self.left_button),
      "rightButton" => Some(&mut self.right_button),
      "start" => Some(&mut self.start),
      "select" => Some(&mut self.select),
      "a" => Some(&mut self.a),
      "b" => Some(&mut self.b),
      _ => None,
    }
  }
}

/// The eight joypad buttons shared with the execution core. The ordinals are
/// part of the core's calling convention and must never be renumbered.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogicalButton {
  Start,
  Select,
  DUp,
  DDown,
  DLeft,
  DRight,
  A,
  B,
}

impl LogicalButton {
  pub fn code(&self) -> u8 {
    match self {
      LogicalButton::Start => 0,
      LogicalButton::Select => 1,
      LogicalButton::DUp => 2,
      LogicalButton::DDown => 3,
      LogicalButton::DLeft => 4,
      LogicalButton::DRight => 5,
      LogicalButton::A => 6,
      LogicalButton::B => 7,
    }
  }

  pub fn from_code(code: u8) -> Option<LogicalButton> {
    match code {
      0 => Some(LogicalButton::Start),
      1 => Some(LogicalButton::Select),
      2 => Some(LogicalButton::DUp),
      3 => Some(LogicalButton::DDown),
      4 => Some(LogicalButton::DLeft),
      5 => Some(LogicalButton::DRight),
      6 => Some(LogicalButton::A),
      7 => Some(LogicalButton::B),
      _ => None,
    }
  }
}

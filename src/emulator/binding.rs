use std::cell::Cell;

use crate::emulator::button::LogicalButton;
use crate::emulator::core::ExecutionCore;

// One core per page session. The flag outlives any single host instance so a
// remounted host cannot run `init` a second time and clobber core memory.
thread_local! {
  static SESSION_INITIALIZED: Cell<bool> = Cell::new(false);
}

fn claim_session_init() -> bool {
  SESSION_INITIALIZED.with(|initialized| !initialized.replace(true))
}

#[cfg(test)]
pub fn reset_session_init() {
  SESSION_INITIALIZED.with(|initialized| initialized.set(false));
}

enum CoreState<C> {
  Unloaded,
  Loaded(C),
}

/// Narrow surface over the execution core that stays callable while the core
/// is still loading. Every operation against an absent core is a no-op; the
/// load race is expected, not exceptional.
pub struct CoreBinding<C: ExecutionCore> {
  state: CoreState<C>,
  pending_rom: Option<Vec<u8>>,
}

impl<C: ExecutionCore> CoreBinding<C> {
  pub fn new() -> CoreBinding<C> {
    CoreBinding {
      state: CoreState::Unloaded,
      pending_rom: None,
    }
  }

  /// Stores the core handle once acquisition resolves. A ROM that arrived
  /// before the core did is applied here, still under the session guard.
  pub fn attach(&mut self, mut core: C) {
    if let CoreState::Loaded(_) = self.state {
      return;
    }
    if let Some(rom) = self.pending_rom.take() {
      if claim_session_init() {
        core.init(&rom);
      }
    }
    self.state = CoreState::Loaded(core);
  }

  pub fn initialize(&mut self, rom: Vec<u8>) {
    match &mut self.state {
      CoreState::Loaded(core) => {
        if claim_session_init() {
          core.init(&rom);
        }
      }
      CoreState::Unloaded => {
        self.pending_rom = Some(rom);
      }
    }
  }

  pub fn press_button(&mut self, button: LogicalButton) {
    if let CoreState::Loaded(core) = &mut self.state {
      log::debug!("button down: {:?}", button);
      core.button_down(button.code());
    }
  }

  pub fn release_button(&mut self, button: LogicalButton) {
    if let CoreState::Loaded(core) = &mut self.state {
      core.button_up(button.code());
    }
  }

  pub fn advance(&mut self, cycle_budget: u32) -> Option<Vec<u8>> {
    match &mut self.state {
      CoreState::Loaded(core) => Some(core.update(cycle_budget)),
      CoreState::Unloaded => None,
    }
  }

  pub fn snapshot(&mut self) -> Option<Vec<u8>> {
    match &mut self.state {
      CoreState::Loaded(core) => Some(core.save_state()),
      CoreState::Unloaded => None,
    }
  }

  pub fn restore(&mut self, state: &[u8]) {
    if let CoreState::Loaded(core) = &mut self.state {
      core.load_state(state);
    }
  }

  pub fn is_loaded(&self) -> bool {
    matches!(self.state, CoreState::Loaded(_))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::emulator::core::MockExecutionCore;
  use mockall::predicate::eq;
  use mockall::Sequence;
  use test_case::test_case;

  #[test]
  fn operations_against_an_unloaded_core_are_no_ops() {
    reset_session_init();
    let mut binding: CoreBinding<MockExecutionCore> = CoreBinding::new();
    binding.press_button(LogicalButton::A);
    binding.release_button(LogicalButton::A);
    binding.restore(&[1, 2, 3]);
    assert_eq!(binding.advance(35128), None);
    assert_eq!(binding.snapshot(), None);
    assert!(!binding.is_loaded());
  }

  #[test_case(LogicalButton::Start ; "start")]
  #[test_case(LogicalButton::Select ; "select")]
  #[test_case(LogicalButton::DUp ; "dpad up")]
  #[test_case(LogicalButton::DDown ; "dpad down")]
  #[test_case(LogicalButton::DLeft ; "dpad left")]
  #[test_case(LogicalButton::DRight ; "dpad right")]
  #[test_case(LogicalButton::A ; "a")]
  #[test_case(LogicalButton::B ; "b")]
  fn press_and_release_forward_the_ordinal_in_order(button: LogicalButton) {
    reset_session_init();
    let mut core = MockExecutionCore::new();
    let mut seq = Sequence::new();
    core.expect_button_down().with(eq(button.code())).times(1).in_sequence(&mut seq).return_const(());
    core.expect_button_up().with(eq(button.code())).times(1).in_sequence(&mut seq).return_const(());
    let mut binding = CoreBinding::new();
    binding.attach(core);
    binding.press_button(button);
    binding.release_button(button);
  }

  #[test]
  fn initialize_runs_init_exactly_once_per_session() {
    reset_session_init();
    let mut core = MockExecutionCore::new();
    core.expect_init().withf(|rom| rom == [0xDE, 0xAD]).times(1).return_const(());
    let mut binding = CoreBinding::new();
    binding.attach(core);
    binding.initialize(vec![0xDE, 0xAD]);
    binding.initialize(vec![0xDE, 0xAD]);
  }

  #[test]
  fn a_second_binding_cannot_reinitialize_the_session() {
    reset_session_init();
    let mut first_core = MockExecutionCore::new();
    first_core.expect_init().times(1).return_const(());
    let mut first = CoreBinding::new();
    first.attach(first_core);
    first.initialize(vec![0x01]);

    let second_core = MockExecutionCore::new();
    let mut second = CoreBinding::new();
    second.attach(second_core);
    second.initialize(vec![0x02]);
  }

  #[test]
  fn rom_arriving_before_the_core_is_applied_on_attach() {
    reset_session_init();
    let mut binding = CoreBinding::new();
    binding.initialize(vec![0xCA, 0xFE]);
    let mut core = MockExecutionCore::new();
    core.expect_init().withf(|rom| rom == [0xCA, 0xFE]).times(1).return_const(());
    binding.attach(core);
    assert!(binding.is_loaded());
  }

  #[test]
  fn attach_replaces_absent_with_present_exactly_once() {
    reset_session_init();
    let mut core = MockExecutionCore::new();
    core.expect_update().with(eq(100)).times(1).returning(|_| vec![0x11]);
    let mut binding = CoreBinding::new();
    binding.attach(core);
    // A second attach must not replace the live core.
    binding.attach(MockExecutionCore::new());
    assert_eq!(binding.advance(100), Some(vec![0x11]));
  }
}

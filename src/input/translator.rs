use std::cell::RefCell;
use std::rc::Rc;

use crate::emulator::binding::CoreBinding;
use crate::emulator::button::LogicalButton;
use crate::emulator::core::ExecutionCore;
use crate::input::bindings::{BindingUpdate, KeyBindingSet};
use crate::input::timer::ReleaseTimer;

// Floor on how long the core observes an on-screen tap as held. A tap has no
// tracked key state, so the release edge is synthesized.
pub const MIN_PRESS_MILLIS: u32 = 85;

/// Turns keyboard events and on-screen pad activations into paired
/// press/release calls on the core binding. Owns the session's key bindings;
/// persistence is the configuration store's concern.
pub struct InputTranslator<C: ExecutionCore, T: ReleaseTimer> {
  binding: Rc<RefCell<CoreBinding<C>>>,
  bindings: KeyBindingSet,
  timer: T,
}

impl<C: ExecutionCore + 'static, T: ReleaseTimer> InputTranslator<C, T> {
  pub fn new(binding: Rc<RefCell<CoreBinding<C>>>, bindings: KeyBindingSet, timer: T) -> InputTranslator<C, T> {
    InputTranslator {
      binding,
      bindings,
      timer,
    }
  }

  pub fn key_down(&self, key: &str) {
    if let Some(button) = self.bindings.button_for_key(key) {
      self.binding.borrow_mut().press_button(button);
    }
  }

  pub fn key_up(&self, key: &str) {
    if let Some(button) = self.bindings.button_for_key(key) {
      self.binding.borrow_mut().release_button(button);
    }
  }

  pub fn screen_press(&self, button: LogicalButton) {
    self.binding.borrow_mut().press_button(button);
    let binding = Rc::clone(&self.binding);
    self.timer.after(MIN_PRESS_MILLIS, Box::new(move || {
      binding.borrow_mut().release_button(button);
    }));
  }

  pub fn rebind(&mut self, update: &BindingUpdate) -> KeyBindingSet {
    self.bindings.merge(update);
    self.bindings.clone()
  }

  pub fn bindings(&self) -> &KeyBindingSet {
    &self.bindings
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::emulator::binding::reset_session_init;
  use crate::emulator::core::MockExecutionCore;
  use mockall::predicate::eq;
  use mockall::Sequence;

  struct ManualTimer {
    scheduled: Rc<RefCell<Vec<(u32, Box<dyn FnOnce()>)>>>,
  }

  impl ManualTimer {
    fn new() -> (ManualTimer, Rc<RefCell<Vec<(u32, Box<dyn FnOnce()>)>>>) {
      let scheduled = Rc::new(RefCell::new(Vec::new()));
      (ManualTimer { scheduled: Rc::clone(&scheduled) }, scheduled)
    }
  }

  impl ReleaseTimer for ManualTimer {
    fn after(&self, delay_millis: u32, release: Box<dyn FnOnce()>) {
      self.scheduled.borrow_mut().push((delay_millis, release));
    }
  }

  fn loaded_binding(core: MockExecutionCore) -> Rc<RefCell<CoreBinding<MockExecutionCore>>> {
    reset_session_init();
    let binding = Rc::new(RefCell::new(CoreBinding::new()));
    binding.borrow_mut().attach(core);
    binding
  }

  #[test]
  fn bound_key_presses_and_releases_in_order() {
    let mut core = MockExecutionCore::new();
    let mut seq = Sequence::new();
    core.expect_button_down().with(eq(6)).times(1).in_sequence(&mut seq).return_const(());
    core.expect_button_up().with(eq(6)).times(1).in_sequence(&mut seq).return_const(());
    let (timer, _) = ManualTimer::new();
    let translator = InputTranslator::new(loaded_binding(core), KeyBindingSet::default(), timer);
    translator.key_down("j");
    translator.key_up("j");
  }

  #[test]
  fn unbound_key_produces_no_calls() {
    let core = MockExecutionCore::new();
    let (timer, _) = ManualTimer::new();
    let translator = InputTranslator::new(loaded_binding(core), KeyBindingSet::default(), timer);
    translator.key_down("q");
    translator.key_up("q");
  }

  #[test]
  fn screen_press_synthesizes_a_release_at_the_floor() {
    let mut core = MockExecutionCore::new();
    let mut seq = Sequence::new();
    core.expect_button_down().with(eq(0)).times(1).in_sequence(&mut seq).return_const(());
    core.expect_button_up().with(eq(0)).times(1).in_sequence(&mut seq).return_const(());
    let (timer, scheduled) = ManualTimer::new();
    let translator = InputTranslator::new(loaded_binding(core), KeyBindingSet::default(), timer);
    translator.screen_press(LogicalButton::Start);

    let (delay, release) = scheduled.borrow_mut().pop().unwrap();
    assert_eq!(delay, MIN_PRESS_MILLIS);
    release();
  }

  #[test]
  fn rebind_merges_and_returns_the_session_bindings() {
    let core = MockExecutionCore::new();
    let (timer, _) = ManualTimer::new();
    let mut translator = InputTranslator::new(loaded_binding(core), KeyBindingSet::default(), timer);
    let merged = translator.rebind(&BindingUpdate {
      down: "x".to_string(),
      ..BindingUpdate::default()
    });
    assert_eq!(merged.down, "x");
    assert_eq!(merged.up, "w");
    assert_eq!(translator.bindings().down, "x");
  }

  #[test]
  fn rebound_key_reaches_the_core() {
    let mut core = MockExecutionCore::new();
    core.expect_button_down().with(eq(3)).times(1).return_const(());
    let (timer, _) = ManualTimer::new();
    let mut translator = InputTranslator::new(loaded_binding(core), KeyBindingSet::default(), timer);
    translator.rebind(&BindingUpdate { down: "x".to_string(), ..BindingUpdate::default() });
    translator.key_down("x");
    translator.key_down("s");
  }
}

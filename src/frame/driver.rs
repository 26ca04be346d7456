use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::emulator::binding::CoreBinding;
use crate::emulator::core::ExecutionCore;
use crate::screen::screen::Screen;

pub const CYCLES_PER_FRAME: u32 = 70256;
// Half of the nominal full-frame cycle count is run per display tick.
pub const CYCLE_BUDGET: u32 = CYCLES_PER_FRAME / 2;

/// One display tick: advance the core by the fixed budget, then commit the
/// returned frame verbatim. Ticks after `cancel` make zero core calls.
pub struct FrameDriver<C: ExecutionCore, S: Screen> {
  binding: Rc<RefCell<CoreBinding<C>>>,
  screen: S,
  cancelled: Cell<bool>,
}

impl<C: ExecutionCore, S: Screen> FrameDriver<C, S> {
  pub fn new(binding: Rc<RefCell<CoreBinding<C>>>, screen: S) -> FrameDriver<C, S> {
    FrameDriver {
      binding,
      screen,
      cancelled: Cell::new(false),
    }
  }

  // The timestamp comes from the display scheduler; tick length is not
  // assumed, the budget per tick is fixed regardless.
  pub fn tick(&mut self, _timestamp: f64) {
    if self.cancelled.get() {
      return;
    }
    let frame = match self.binding.borrow_mut().advance(CYCLE_BUDGET) {
      Some(frame) => frame,
      None => return,
    };
    self.screen.present(&frame);
  }

  pub fn cancel(&self) {
    self.cancelled.set(true);
  }

  pub fn is_cancelled(&self) -> bool {
    self.cancelled.get()
  }
}

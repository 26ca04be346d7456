use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// requestAnimationFrame loop that re-registers itself each tick. The pending
/// frame id is retained so teardown cancels deterministically; once cancelled
/// the callback never runs again.
pub struct RafLoop {
  raf_id: Rc<Cell<i32>>,
  active: Rc<Cell<bool>>,
  callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl RafLoop {
  pub fn start<F: FnMut(f64) + 'static>(mut tick: F) -> RafLoop {
    let callback = Rc::new(RefCell::new(None::<Closure<dyn FnMut(f64)>>));
    let raf_id = Rc::new(Cell::new(0));
    let active = Rc::new(Cell::new(true));

    let looped = Rc::clone(&callback);
    let next_id = Rc::clone(&raf_id);
    let running = Rc::clone(&active);
    *callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
      if !running.get() {
        return;
      }
      tick(timestamp);
      if running.get() {
        if let Some(closure) = looped.borrow().as_ref() {
          next_id.set(request_animation_frame(closure));
        }
      }
    }));

    if let Some(closure) = callback.borrow().as_ref() {
      raf_id.set(request_animation_frame(closure));
    }

    RafLoop {
      raf_id,
      active,
      callback,
    }
  }

  pub fn cancel(&self) {
    self.active.set(false);
    if let Some(window) = web_sys::window() {
      let _ = window.cancel_animation_frame(self.raf_id.get());
    }
    // Dropping the closure breaks the self-referential cycle.
    self.callback.borrow_mut().take();
  }
}

fn request_animation_frame(closure: &Closure<dyn FnMut(f64)>) -> i32 {
  web_sys::window()
    .and_then(|window| window.request_animation_frame(closure.as_ref().unchecked_ref()).ok())
    .unwrap_or(0)
}

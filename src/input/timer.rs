use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

pub trait ReleaseTimer {
  fn after(&self, delay_millis: u32, release: Box<dyn FnOnce()>);
}

/// setTimeout-backed timer. The closure frees itself after its single
/// invocation, so per-press scheduling does not leak.
pub struct WebReleaseTimer;

impl ReleaseTimer for WebReleaseTimer {
  fn after(&self, delay_millis: u32, release: Box<dyn FnOnce()>) {
    let window = match web_sys::window() {
      Some(window) => window,
      None => return,
    };
    let callback = Closure::once_into_js(release);
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
      callback.unchecked_ref(),
      delay_millis as i32,
    );
  }
}

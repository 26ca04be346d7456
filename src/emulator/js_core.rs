use js_sys::{Function, Promise, Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::emulator::core::ExecutionCore;
use crate::error::HostError;

/// Execution core reached through a JS module object. The module is the
/// compiled core's export surface; the six primitives are looked up by name
/// once, at attach time.
pub struct JsExecutionCore {
  module: JsValue,
  init: Function,
  update: Function,
  button_down: Function,
  button_up: Function,
  save_state: Function,
  load_state: Function,
}

impl JsExecutionCore {
  pub async fn acquire(loader: Promise) -> Result<JsExecutionCore, JsValue> {
    let module = JsFuture::from(loader).await?;
    JsExecutionCore::from_module(module).map_err(JsValue::from)
  }

  pub fn from_module(module: JsValue) -> Result<JsExecutionCore, HostError> {
    Ok(JsExecutionCore {
      init: JsExecutionCore::export(&module, "init")?,
      update: JsExecutionCore::export(&module, "update")?,
      button_down: JsExecutionCore::export(&module, "button_down")?,
      button_up: JsExecutionCore::export(&module, "button_up")?,
      save_state: JsExecutionCore::export(&module, "save_state")?,
      load_state: JsExecutionCore::export(&module, "load_state")?,
      module,
    })
  }

  fn export(module: &JsValue, name: &'static str) -> Result<Function, HostError> {
    Reflect::get(module, &JsValue::from_str(name))
      .ok()
      .and_then(|value| value.dyn_into::<Function>().ok())
      .ok_or(HostError::MissingCoreExport(name))
  }

  fn bytes_from(value: Result<JsValue, JsValue>) -> Vec<u8> {
    value
      .ok()
      .and_then(|value| value.dyn_into::<Uint8Array>().ok())
      .map(|array| array.to_vec())
      .unwrap_or_default()
  }
}

impl ExecutionCore for JsExecutionCore {
  fn init(&mut self, rom: &[u8]) {
    let _ = self.init.call1(&self.module, &JsValue::from(Uint8Array::from(rom)));
  }

  fn update(&mut self, cycle_budget: u32) -> Vec<u8> {
    JsExecutionCore::bytes_from(self.update.call1(&self.module, &JsValue::from(cycle_budget)))
  }

  fn button_down(&mut self, code: u8) {
    let _ = self.button_down.call1(&self.module, &JsValue::from(code));
  }

  fn button_up(&mut self, code: u8) {
    let _ = self.button_up.call1(&self.module, &JsValue::from(code));
  }

  fn save_state(&mut self) -> Vec<u8> {
    JsExecutionCore::bytes_from(self.save_state.call0(&self.module))
  }

  fn load_state(&mut self, state: &[u8]) {
    let _ = self.load_state.call1(&self.module, &JsValue::from(Uint8Array::from(state)));
  }
}

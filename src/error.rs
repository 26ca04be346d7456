use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum HostError {
  #[error("canvas element `{0}` was not found")]
  CanvasMissing(String),
  #[error("canvas 2d context is unavailable")]
  ContextUnavailable,
  #[error("core module is missing the `{0}` export")]
  MissingCoreExport(&'static str),
  #[error("storage object is missing the `{0}` function")]
  MissingStoreFunction(&'static str),
}

impl From<HostError> for JsValue {
  fn from(error: HostError) -> JsValue {
    JsValue::from_str(&error.to_string())
  }
}

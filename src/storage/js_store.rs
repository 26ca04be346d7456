use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::error::HostError;
use crate::storage::store::{StateStore, StoreFuture};

/// StateStore over a localForage-style JS object whose `getItem`/`setItem`/
/// `clear` return promises. A store that answers synchronously (localStorage
/// wrapped in an object) is tolerated by using the returned value directly.
pub struct JsStateStore {
  target: JsValue,
  get_item: Function,
  set_item: Function,
  clear: Function,
}

impl JsStateStore {
  pub fn new(target: JsValue) -> Result<JsStateStore, HostError> {
    Ok(JsStateStore {
      get_item: JsStateStore::function(&target, "getItem")?,
      set_item: JsStateStore::function(&target, "setItem")?,
      clear: JsStateStore::function(&target, "clear")?,
      target,
    })
  }

  fn function(target: &JsValue, name: &'static str) -> Result<Function, HostError> {
    Reflect::get(target, &JsValue::from_str(name))
      .ok()
      .and_then(|value| value.dyn_into::<Function>().ok())
      .ok_or(HostError::MissingStoreFunction(name))
  }

  async fn settled(value: JsValue) -> Option<JsValue> {
    match value.dyn_into::<Promise>() {
      Ok(promise) => JsFuture::from(promise).await.ok(),
      Err(value) => Some(value),
    }
  }
}

impl StateStore for JsStateStore {
  fn get_item(&self, key: &str) -> StoreFuture<Option<String>> {
    let result = self.get_item.call1(&self.target, &JsValue::from_str(key));
    Box::pin(async move {
      match result {
        Ok(value) => JsStateStore::settled(value).await.and_then(|value| value.as_string()),
        Err(_) => None,
      }
    })
  }

  fn set_item(&self, key: &str, value: String) -> StoreFuture<()> {
    let result = self.set_item.call2(&self.target, &JsValue::from_str(key), &JsValue::from_str(&value));
    Box::pin(async move {
      if let Ok(value) = result {
        let _ = JsStateStore::settled(value).await;
      }
    })
  }

  fn clear(&self) -> StoreFuture<()> {
    let result = self.clear.call0(&self.target);
    Box::pin(async move {
      if let Ok(value) = result {
        let _ = JsStateStore::settled(value).await;
      }
    })
  }
}

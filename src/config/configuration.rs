use std::rc::Rc;

use crate::config::layout::ControlLayout;
use crate::input::bindings::KeyBindingSet;
use crate::storage::store::{keys, StateStore};

/// Durable mirror of the session's key bindings and pad layout. Reads fall
/// back to compiled defaults when a key is absent or its stored value fails
/// to parse; writes always overwrite the whole object.
pub struct ConfigurationStore<S: StateStore> {
  store: Rc<S>,
}

impl<S: StateStore> ConfigurationStore<S> {
  pub fn new(store: Rc<S>) -> ConfigurationStore<S> {
    ConfigurationStore { store }
  }

  pub async fn load_bindings(&self) -> KeyBindingSet {
    match self.store.get_item(keys::CONTROLS).await {
      Some(raw) => match serde_json::from_str(&raw) {
        Ok(bindings) => bindings,
        Err(error) => {
          log::warn!("stored key bindings are malformed ({}), using defaults", error);
          KeyBindingSet::default()
        }
      },
      None => KeyBindingSet::default(),
    }
  }

  pub async fn store_bindings(&self, bindings: &KeyBindingSet) {
    if let Ok(raw) = serde_json::to_string(bindings) {
      self.store.set_item(keys::CONTROLS, raw).await;
    }
  }

  pub async fn load_layout(&self) -> ControlLayout {
    match self.store.get_item(keys::PAD_LAYOUT).await {
      Some(raw) => match serde_json::from_str(&raw) {
        Ok(layout) => layout,
        Err(error) => {
          log::warn!("stored pad layout is malformed ({}), using defaults", error);
          ControlLayout::default()
        }
      },
      None => ControlLayout::default(),
    }
  }

  pub async fn store_layout(&self, layout: &ControlLayout) {
    if let Ok(raw) = serde_json::to_string(layout) {
      self.store.set_item(keys::PAD_LAYOUT, raw).await;
    }
  }

  /// Wipes every persisted key, save history included. In-memory session
  /// state is left alone.
  pub async fn clear_all(&self) {
    self.store.clear().await;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::store::test::MemoryStore;

  #[test]
  fn absent_bindings_fall_back_to_defaults() {
    let config = ConfigurationStore::new(Rc::new(MemoryStore::new()));
    let bindings = pollster::block_on(config.load_bindings());
    assert_eq!(bindings, KeyBindingSet::default());
  }

  #[test]
  fn malformed_bindings_fall_back_to_defaults() {
    let store = Rc::new(MemoryStore::with_item(keys::CONTROLS, r#"{"up":42}"#));
    let config = ConfigurationStore::new(store);
    assert_eq!(pollster::block_on(config.load_bindings()), KeyBindingSet::default());
  }

  #[test]
  fn stored_bindings_round_trip() {
    let store = Rc::new(MemoryStore::new());
    let config = ConfigurationStore::new(Rc::clone(&store));
    let mut bindings = KeyBindingSet::default();
    bindings.a = "z".to_string();
    pollster::block_on(config.store_bindings(&bindings));
    assert_eq!(pollster::block_on(config.load_bindings()), bindings);
  }

  #[test]
  fn malformed_layout_falls_back_to_defaults() {
    let store = Rc::new(MemoryStore::with_item(keys::PAD_LAYOUT, "not json"));
    let config = ConfigurationStore::new(store);
    assert_eq!(pollster::block_on(config.load_layout()), ControlLayout::default());
  }

  #[test]
  fn stored_layout_round_trips() {
    let store = Rc::new(MemoryStore::new());
    let config = ConfigurationStore::new(Rc::clone(&store));
    let mut layout = ControlLayout::default();
    layout.set_offset("a", 5.0, 7.0);
    pollster::block_on(config.store_layout(&layout));
    assert_eq!(pollster::block_on(config.load_layout()), layout);
  }

  #[test]
  fn clear_all_erases_every_key() {
    let store = Rc::new(MemoryStore::new());
    let config = ConfigurationStore::new(Rc::clone(&store));
    pollster::block_on(config.store_bindings(&KeyBindingSet::default()));
    pollster::block_on(config.store_layout(&ControlLayout::default()));
    assert_eq!(store.len(), 2);
    pollster::block_on(config.clear_all());
    assert_eq!(store.len(), 0);
  }
}

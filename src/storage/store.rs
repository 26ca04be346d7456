use std::future::Future;
use std::pin::Pin;

use mockall::automock;

pub type StoreFuture<T> = Pin<Box<dyn Future<Output = T>>>;

/// Keys the host persists under. Shared between the configuration store and
/// the save-state manager so `clear` wipes everything at once.
pub mod keys {
  pub const SAVES: &str = "saves";
  pub const CONTROLS: &str = "controls";
  pub const PAD_LAYOUT: &str = "gamePadLocations";
}

/// Asynchronous key-value persistence. Values are opaque strings; shaping
/// them is the caller's concern.
#[automock]
pub trait StateStore {
  fn get_item(&self, key: &str) -> StoreFuture<Option<String>>;
  fn set_item(&self, key: &str, value: String) -> StoreFuture<()>;
  fn clear(&self) -> StoreFuture<()>;
}

#[cfg(test)]
pub mod test {
  use std::cell::RefCell;
  use std::collections::HashMap;
  use std::future::ready;

  use super::{StateStore, StoreFuture};

  pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
  }

  impl MemoryStore {
    pub fn new() -> MemoryStore {
      MemoryStore {
        items: RefCell::new(HashMap::new()),
      }
    }

    pub fn with_item(key: &str, value: &str) -> MemoryStore {
      let store = MemoryStore::new();
      store.items.borrow_mut().insert(key.to_string(), value.to_string());
      store
    }

    pub fn item(&self, key: &str) -> Option<String> {
      self.items.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
      self.items.borrow().len()
    }
  }

  impl StateStore for MemoryStore {
    fn get_item(&self, key: &str) -> StoreFuture<Option<String>> {
      Box::pin(ready(self.items.borrow().get(key).cloned()))
    }

    fn set_item(&self, key: &str, value: String) -> StoreFuture<()> {
      self.items.borrow_mut().insert(key.to_string(), value);
      Box::pin(ready(()))
    }

    fn clear(&self) -> StoreFuture<()> {
      self.items.borrow_mut().clear();
      Box::pin(ready(()))
    }
  }
}

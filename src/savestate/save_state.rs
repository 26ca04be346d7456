use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;

use crate::emulator::binding::CoreBinding;
use crate::emulator::core::ExecutionCore;
use crate::storage::store::{keys, StateStore};

/// A core snapshot with its creation time in milliseconds since the epoch.
/// The snapshot bytes are opaque to the host.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
  pub date: f64,
  #[serde_as(as = "Base64")]
  pub data: Vec<u8>,
}

/// Append-only save history under a single storage key, newest last.
pub struct SaveStateManager<C: ExecutionCore, S: StateStore> {
  binding: Rc<RefCell<CoreBinding<C>>>,
  store: Rc<S>,
}

impl<C: ExecutionCore, S: StateStore> SaveStateManager<C, S> {
  pub fn new(binding: Rc<RefCell<CoreBinding<C>>>, store: Rc<S>) -> SaveStateManager<C, S> {
    SaveStateManager { binding, store }
  }

  /// Snapshots the core and appends the record. The append is a
  /// read-modify-write of the whole history; two saves whose storage
  /// round-trips overlap can lose one record.
  pub async fn make_save_state(&self) {
    let data = match self.binding.borrow_mut().snapshot() {
      Some(data) => data,
      None => return,
    };
    let record = SaveRecord { date: now_millis(), data };
    let mut saves = self.read_history().await;
    saves.push(record);
    if let Ok(raw) = serde_json::to_string(&saves) {
      self.store.set_item(keys::SAVES, raw).await;
    }
  }

  pub async fn load_save_state(&self) {
    let saves = self.read_history().await;
    match saves.last() {
      Some(save) => {
        log::info!("loading save state from {}", save.date);
        self.binding.borrow_mut().restore(&save.data);
      }
      None => log::info!("no save states to load"),
    }
  }

  async fn read_history(&self) -> Vec<SaveRecord> {
    match self.store.get_item(keys::SAVES).await {
      Some(raw) => match serde_json::from_str(&raw) {
        Ok(saves) => saves,
        Err(error) => {
          log::warn!("stored save history is malformed ({}), starting a new one", error);
          Vec::new()
        }
      },
      None => Vec::new(),
    }
  }
}

fn now_millis() -> f64 {
  #[cfg(target_arch = "wasm32")]
  {
    js_sys::Date::now()
  }
  #[cfg(not(target_arch = "wasm32"))]
  {
    std::time::SystemTime::now()
      .duration_since(std::time::UNIX_EPOCH)
      .map(|elapsed| elapsed.as_millis() as f64)
      .unwrap_or(0.0)
  }
}

use std::cell::RefCell;
use std::rc::Rc;

use closure::closure;
use js_sys::Promise;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::KeyboardEvent;

use crate::config::configuration::ConfigurationStore;
use crate::config::layout::ControlLayout;
use crate::emulator::binding::CoreBinding;
use crate::emulator::button::LogicalButton;
use crate::emulator::js_core::JsExecutionCore;
use crate::frame::driver::FrameDriver;
use crate::frame::raf::RafLoop;
use crate::input::bindings::BindingUpdate;
use crate::input::timer::WebReleaseTimer;
use crate::input::translator::InputTranslator;
use crate::savestate::save_state::SaveStateManager;
use crate::screen::canvas_screen::CanvasScreen;
use crate::storage::js_store::JsStateStore;

type Binding = Rc<RefCell<CoreBinding<JsExecutionCore>>>;
type Translator = Rc<RefCell<InputTranslator<JsExecutionCore, WebReleaseTimer>>>;
type Driver = Rc<RefCell<FrameDriver<JsExecutionCore, CanvasScreen>>>;

/// The emulator host. JS constructs one per session via `create` and passes
/// the handle to whichever components need it; there are no ambient globals.
#[wasm_bindgen]
pub struct WebHost {
  canvas_id: String,
  binding: Binding,
  translator: Translator,
  layout: ControlLayout,
  config: Rc<ConfigurationStore<JsStateStore>>,
  saves: Rc<SaveStateManager<JsExecutionCore, JsStateStore>>,
  driver: Option<Driver>,
  frame_loop: Option<RafLoop>,
  keydown: Option<Closure<dyn FnMut(KeyboardEvent)>>,
  keyup: Option<Closure<dyn FnMut(KeyboardEvent)>>,
}

#[wasm_bindgen]
impl WebHost {
  /// Async factory: `await WebHost.create(canvasId, coreLoader, storage)`.
  /// `core_loader` resolves to the core module's export object; `storage` is
  /// a localForage-style object. Core acquisition starts here and resolves
  /// in the background; input arriving before it finishes is dropped by the
  /// core binding.
  pub async fn create(canvas_id: String, core_loader: Promise, storage: JsValue) -> Result<WebHost, JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init();

    let store = Rc::new(JsStateStore::new(storage)?);
    let config = Rc::new(ConfigurationStore::new(Rc::clone(&store)));
    let bindings = config.load_bindings().await;
    let layout = config.load_layout().await;

    let binding: Binding = Rc::new(RefCell::new(CoreBinding::new()));
    {
      let binding = Rc::clone(&binding);
      spawn_local(async move {
        match JsExecutionCore::acquire(core_loader).await {
          Ok(core) => binding.borrow_mut().attach(core),
          Err(error) => log::error!("core module failed to load: {:?}", error),
        }
      });
    }

    let translator: Translator = Rc::new(RefCell::new(InputTranslator::new(
      Rc::clone(&binding),
      bindings,
      WebReleaseTimer,
    )));
    let saves = Rc::new(SaveStateManager::new(Rc::clone(&binding), store));

    let mut host = WebHost {
      canvas_id,
      binding,
      translator,
      layout,
      config,
      saves,
      driver: None,
      frame_loop: None,
      keydown: None,
      keyup: None,
    };
    host.attach_keyboard();
    Ok(host)
  }

  /// Hands the fully read ROM to the core and starts the frame loop. The
  /// session-wide guard inside the binding makes a repeat call harmless.
  pub fn load_rom(&mut self, rom: Vec<u8>) -> Result<(), JsValue> {
    self.binding.borrow_mut().initialize(rom);
    self.stop_frame_loop();

    let screen = CanvasScreen::new(&self.canvas_id)?;
    let driver: Driver = Rc::new(RefCell::new(FrameDriver::new(Rc::clone(&self.binding), screen)));
    let ticker = Rc::clone(&driver);
    self.frame_loop = Some(RafLoop::start(move |timestamp| {
      ticker.borrow_mut().tick(timestamp);
    }));
    self.driver = Some(driver);
    Ok(())
  }

  pub fn key_down(&self, key: &str) {
    self.translator.borrow().key_down(key);
  }

  pub fn key_up(&self, key: &str) {
    self.translator.borrow().key_up(key);
  }

  /// Entry point for the on-screen pad; `button` is a LogicalButton ordinal.
  pub fn press_screen_button(&self, button: u8) {
    match LogicalButton::from_code(button) {
      Some(button) => self.translator.borrow().screen_press(button),
      None => log::warn!("ignoring unknown pad button code {}", button),
    }
  }

  /// Applies a partial rebind submitted as JSON, e.g. `{"down":"x"}`. Empty
  /// fields keep their current binding.
  pub fn rebind(&self, update: &str) {
    let update: BindingUpdate = match serde_json::from_str(update) {
      Ok(update) => update,
      Err(error) => {
        log::warn!("rejecting malformed binding update: {}", error);
        return;
      }
    };
    let merged = self.translator.borrow_mut().rebind(&update);
    let config = Rc::clone(&self.config);
    spawn_local(async move {
      config.store_bindings(&merged).await;
    });
  }

  pub fn move_control(&mut self, control: &str, x: f64, y: f64) {
    if !self.layout.set_offset(control, x, y) {
      log::warn!("no such pad control: {}", control);
      return;
    }
    let layout = self.layout.clone();
    let config = Rc::clone(&self.config);
    spawn_local(async move {
      config.store_layout(&layout).await;
    });
  }

  pub fn make_save_state(&self) {
    let saves = Rc::clone(&self.saves);
    spawn_local(async move {
      saves.make_save_state().await;
    });
  }

  pub fn load_save_state(&self) {
    let saves = Rc::clone(&self.saves);
    spawn_local(async move {
      saves.load_save_state().await;
    });
  }

  pub fn clear_user_data(&self) {
    let config = Rc::clone(&self.config);
    spawn_local(async move {
      config.clear_all().await;
    });
  }

  pub fn bindings_json(&self) -> String {
    serde_json::to_string(self.translator.borrow().bindings()).unwrap_or_default()
  }

  pub fn layout_json(&self) -> String {
    serde_json::to_string(&self.layout).unwrap_or_default()
  }

  pub fn core_loaded(&self) -> bool {
    self.binding.borrow().is_loaded()
  }

  /// Stops the frame loop and detaches keyboard listeners. Storage and the
  /// core handle are one-shot resources and are left alone.
  pub fn teardown(&mut self) {
    self.stop_frame_loop();
    self.detach_keyboard();
  }
}

impl WebHost {
  fn stop_frame_loop(&mut self) {
    if let Some(frame_loop) = self.frame_loop.take() {
      frame_loop.cancel();
    }
    if let Some(driver) = self.driver.take() {
      driver.borrow().cancel();
    }
  }

  fn attach_keyboard(&mut self) {
    let window = match web_sys::window() {
      Some(window) => window,
      None => return,
    };
    let translator = &self.translator;
    let keydown = Closure::<dyn FnMut(KeyboardEvent)>::new(closure!(clone translator, |event: KeyboardEvent| {
      translator.borrow().key_down(&event.key());
    }));
    let keyup = Closure::<dyn FnMut(KeyboardEvent)>::new(closure!(clone translator, |event: KeyboardEvent| {
      translator.borrow().key_up(&event.key());
    }));
    let _ = window.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref());
    let _ = window.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref());
    self.keydown = Some(keydown);
    self.keyup = Some(keyup);
  }

  fn detach_keyboard(&mut self) {
    let window = match web_sys::window() {
      Some(window) => window,
      None => return,
    };
    if let Some(keydown) = self.keydown.take() {
      let _ = window.remove_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref());
    }
    if let Some(keyup) = self.keyup.take() {
      let _ = window.remove_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref());
    }
  }
}

use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData, Window};

use crate::error::HostError;
use crate::screen::screen::{Screen, FRAME_BYTES, FRAME_WIDTH};

pub struct CanvasScreen {
  ctx: CanvasRenderingContext2d,
}

impl CanvasScreen {
  pub fn new(canvas_id: &str) -> Result<CanvasScreen, HostError> {
    let canvas: HtmlCanvasElement = web_sys::window()
      .and_then(|window: Window| window.document())
      .and_then(|document| document.get_element_by_id(canvas_id))
      .and_then(|canvas_element| canvas_element.dyn_into::<HtmlCanvasElement>().ok())
      .ok_or_else(|| HostError::CanvasMissing(canvas_id.to_string()))?;
    let ctx = canvas
      .get_context("2d")
      .ok()
      .flatten()
      .and_then(|context| context.dyn_into::<CanvasRenderingContext2d>().ok())
      .ok_or(HostError::ContextUnavailable)?;
    Ok(CanvasScreen { ctx })
  }
}

impl Screen for CanvasScreen {
  fn present(&mut self, frame: &[u8]) {
    if frame.len() != FRAME_BYTES {
      log::warn!("dropping frame of {} bytes, expected {}", frame.len(), FRAME_BYTES);
      return;
    }
    let image_data =
      ImageData::new_with_u8_clamped_array(Clamped(frame), FRAME_WIDTH as u32).unwrap();
    let _ = self.ctx.put_image_data(&image_data, 0.0, 0.0);
  }
}

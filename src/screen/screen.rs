use mockall::automock;

pub const FRAME_WIDTH: usize = 160;
pub const FRAME_HEIGHT: usize = 144;
pub const FRAME_BYTES: usize = FRAME_WIDTH * FRAME_HEIGHT * 4;

/// Sink for one full RGBA frame per display tick.
#[automock]
pub trait Screen {
  fn present(&mut self, frame: &[u8]);
}

use mockall::automock;

/// The six-call contract with the opaque execution core. The host never
/// reaches past these operations.
#[automock]
pub trait ExecutionCore {
  fn init(&mut self, rom: &[u8]);
  fn update(&mut self, cycle_budget: u32) -> Vec<u8>;
  fn button_down(&mut self, code: u8);
  fn button_up(&mut self, code: u8);
  fn save_state(&mut self) -> Vec<u8>;
  fn load_state(&mut self, state: &[u8]);
}

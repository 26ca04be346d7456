extern crate alloc;
extern crate core;
extern crate serde;

pub mod config;
pub mod emulator;
pub mod error;
pub mod frame;
pub mod host;
pub mod input;
pub mod savestate;
pub mod screen;
pub mod storage;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod app;
pub mod dom;
pub mod storage;

pub use app::DiceApp;
pub use storage::{WebStorage, WebStorageError};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    if !WebStorage::open().is_attached() {
        dom::console_error("dicebox: localStorage unavailable, progress will not be saved");
    }
}

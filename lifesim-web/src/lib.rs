#![forbid(unsafe_code)]
//! Browser front door for the Lifesim engine.
//!
//! The UI talks to [`bridge::LifeApp`] through JSON strings; every document
//! lands in `localStorage` through [`storage::LocalStorageStore`].
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub mod bridge;
pub mod dom;
pub mod error;
pub mod input;
pub mod storage;

pub use error::BridgeError;
pub use lifesim_game::*;
pub use storage::{LocalStorageStore, create_local_engine};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    log::debug!("lifesim-web ready");
}

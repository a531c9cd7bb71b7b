//! Browser chat widget for the portfolio assistant.
//!
//! Built as a CSR Leptos app: `trunk` or `wasm-pack` with `--features csr`
//! produces the bundle the static site loads. Without `csr` the crate
//! compiles natively so state and classification logic can be unit tested.

pub mod components;
pub mod net;
pub mod state;

#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(components::chat_widget::ChatWidget);
}

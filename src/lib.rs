//! Memo photo albums: browser entry points
//!
//! Compiled to wasm and loaded by every page. Script tags call `initPage`
//! ([`init`]) each time they are evaluated, including after fragment swaps.
//! Listeners are attached once per page. The first call also runs the
//! fragment-loaded hooks for the initial document and publishes
//! `window.onloadCallbackRecaptcha` for the CAPTCHA script's `?onload=`.
//!
//! ```html
//! <script type="module">
//!   import wasm, { initPage } from "/assets/js/memo_web.js";
//!   await wasm();
//!   initPage();
//! </script>
//! ```

mod bridge;
mod dom;
mod widgets;

use wasm_bindgen::prelude::*;

pub use bridge::init;
pub use dom::WebDom;
pub use widgets::{Grecaptcha, PhotoSwipe};

/// Called once the CAPTCHA script has loaded; remembered until [`init`]
/// creates the page
#[wasm_bindgen(js_name = onloadCallbackRecaptcha)]
pub fn onload_callback_recaptcha() {
    bridge::captcha_loaded();
}

/// Converts a label to a url friendly name
#[wasm_bindgen(js_name = labelToName)]
pub fn label_to_name(label: &str) -> String {
    memo_web_core::label_to_name(label)
}

//! Thin wrappers over the browser's dialog, scroll, and console APIs.

use gloo_utils::window;
use wasm_bindgen::JsValue;

/// Blocking message dialog.
pub fn alert(message: &str) {
    let _ = window().alert_with_message(message);
}

/// Blocking yes/no dialog. Treats any failure as "no".
pub fn confirm(message: &str) -> bool {
    window().confirm_with_message(message).unwrap_or(false)
}

pub fn scroll_to_top() {
    let options = web_sys::ScrollToOptions::new();
    options.set_top(0.0);
    options.set_behavior(web_sys::ScrollBehavior::Smooth);
    window().scroll_to_with_scroll_to_options(&options);
}

pub fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

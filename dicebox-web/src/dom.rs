use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Storage, Window};

/// Retrieve the global `window` object, if running in a browser.
#[must_use]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Log an error message to the browser console.
pub fn console_error(message: &str) {
    web_sys::console::error_1(&JsValue::from(message));
}

/// Access the browser `localStorage` handle.
///
/// # Errors
/// Returns an error if the browser window cannot be accessed or `localStorage` is unavailable.
pub fn local_storage() -> Result<Storage, JsValue> {
    window()
        .ok_or_else(|| JsValue::from_str("window unavailable"))?
        .local_storage()?
        .ok_or_else(|| JsValue::from_str("localStorage unavailable"))
}

/// Add or remove a class on the `<html>` element.
pub fn set_root_class(class: &str, enabled: bool) {
    let Some(html) = window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.document_element())
    else {
        return;
    };
    let result = if enabled {
        html.class_list().add_1(class)
    } else {
        html.class_list().remove_1(class)
    };
    if let Err(err) = result {
        log::warn!("could not toggle `{class}`: {}", js_error_message(&err));
    }
}

/// Set a `data-*` attribute on the `<html>` element.
pub fn set_root_data(name: &str, value: &str) {
    if let Some(html) = window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.document_element())
    {
        if let Err(err) = html.set_attribute(&format!("data-{name}"), value) {
            log::warn!("could not set `data-{name}`: {}", js_error_message(&err));
        }
    }
}

//! Expose the `markup-diff` crate's functionality to WebAssembly.
use wasm_bindgen::prelude::*;

#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc<'_> = wee_alloc::WeeAlloc::INIT;

/// WASM wrapper around `crate::diff_markup` for diffing markup documents.
///
/// # Errors
///
/// Throws a JavaScript error when either input is not well-formed markup.
#[wasm_bindgen(js_name = diffMarkup)]
pub fn diff_markup(old: &str, new: &str) -> Result<String, JsError> {
    set_panic_hook();

    Ok(crate::diff_markup(old, new)?)
}

fn set_panic_hook() {
    // https://github.com/rustwasm/console_error_panic_hook#readme
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

use gasdash_shared::ApiError;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::session_context::{SessionAction, SessionContext};

/// Log a failed request to the browser console and hand back the toast text.
/// A 401 also ends the session so the router falls back to the login page.
pub fn report_error(context: &str, err: &ApiError, session: Option<&SessionContext>) -> String {
    web_sys::console::error_1(&format!("{context}: {err}").into());
    if err.requires_login() {
        if let Some(session) = session {
            session.dispatch(SessionAction::SignOut);
        }
    }
    err.user_message()
}

/// Offer `contents` as a file download named `filename`.
pub fn download_csv(filename: &str, contents: &str) -> Result<(), JsValue> {
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(contents));
    let options = BlobPropertyBag::new();
    options.set_type("text/csv;charset=utf-8");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|win| win.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))?;
    let anchor = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();
    Url::revoke_object_url(&url)
}

/// Browser confirm dialog; a missing window counts as "no".
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|win| win.confirm_with_message(message).ok())
        .unwrap_or(false)
}

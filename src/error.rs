//! Errors raised while installing the bridge into a page.

use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("no global `window` exists")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("touch capability was already issued")]
    CapabilityTaken,

    #[error("JS call `{context}` failed: {message}")]
    Js { context: &'static str, message: String },
}

pub type BridgeResult<T> = Result<T, BridgeError>;

impl BridgeError {
    pub fn js(context: &'static str, value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::JSON::stringify(&value)
                    .ok()
                    .and_then(|s| s.as_string())
            })
            .unwrap_or_else(|| format!("{:?}", value));
        Self::Js { context, message }
    }
}

/// Attach a call-site label to a JS result.
pub trait JsContext<T> {
    fn context(self, context: &'static str) -> BridgeResult<T>;
}

impl<T> JsContext<T> for Result<T, JsValue> {
    fn context(self, context: &'static str) -> BridgeResult<T> {
        self.map_err(|e| BridgeError::js(context, e))
    }
}

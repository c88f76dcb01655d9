use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("no global window available")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("DOM call failed: {0}")]
    Dom(String),
    #[error("invalid stage config: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<JsValue> for InteractionError {
    fn from(value: JsValue) -> Self {
        InteractionError::Dom(format!("{:?}", value))
    }
}

pub type Result<T> = std::result::Result<T, InteractionError>;

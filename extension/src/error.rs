use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum Error {
    #[error("storage unavailable: {0}")]
    Storage(String),
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("{0}")]
    Js(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("unexpected value for `{key}`: {value}")]
    UnexpectedValue {
        key: String,
        value: serde_json::Value,
    },
    #[error("{0}: {1}")]
    Context(String, Box<Self>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        match value.as_string() {
            Some(message) => Self::Js(message),
            None => Self::Js(format!("{value:?}")),
        }
    }
}

impl From<serde_wasm_bindgen::Error> for Error {
    fn from(value: serde_wasm_bindgen::Error) -> Self {
        Self::Serialization(value.to_string())
    }
}

impl From<Error> for JsValue {
    fn from(value: Error) -> Self {
        JsValue::from_str(&value.to_string())
    }
}

impl Error {
    pub fn ctx(self, msg: &str) -> Self {
        Self::Context(msg.to_owned(), Box::new(self))
    }
}

pub trait ContextExt<T> {
    fn ctx(self, msg: &str) -> Result<T>;
}

impl<T> ContextExt<T> for Result<T> {
    fn ctx(self, msg: &str) -> Result<T> {
        self.map_err(|e| e.ctx(msg))
    }
}

use wasm_bindgen::{JsCast, JsValue};

/// Failures crossing the invoke/event bridge to the desktop host.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum BridgeError {
    /// The host bridge globals are missing or threw before a promise was returned.
    #[error("desktop bridge unavailable: {0}")]
    Unavailable(String),
    #[error("failed to serialize arguments: {0}")]
    Serialize(String),
    /// The backend rejected the request.
    #[error("backend rejected {command}: {message}")]
    Rejected { command: String, message: String },
    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

/// Failures while validating, reading or forwarding a selected file.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FileError {
    #[error("{name} is not a CSV file (type {mime:?})")]
    InvalidFileType { name: String, mime: String },
    #[error("failed to read {name}: {cause}")]
    UnknownRead { name: String, cause: String },
    #[error("failed to ingest {name}: {source}")]
    Ingest {
        name: String,
        #[source]
        source: BridgeError,
    },
}

impl FileError {
    /// Stable tag for the failure class, used in notifications and logs.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::InvalidFileType { .. } => "InvalidFileType",
            Self::UnknownRead { .. } => "UnknownReadError",
            Self::Ingest { .. } => "IngestError",
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            Self::InvalidFileType { name, .. }
            | Self::UnknownRead { name, .. }
            | Self::Ingest { name, .. } => name,
        }
    }
}

/// Best-effort text for a thrown JS value.
pub(crate) fn js_error_text(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{value:?}")
}

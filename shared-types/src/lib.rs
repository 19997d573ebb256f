//! Shared types between the shell front-end and the desktop backend
//!
//! These types describe the bridge contract used by both:
//! - backend command handlers (native Rust)
//! - the shell front-end (WASM)
//!
//! Serializable with serde for JSON over the invoke/event bridge

use serde::{Deserialize, Serialize};

// ============================================================================
// Commands
// ============================================================================

/// Backend command that parses an uploaded CSV file.
pub const COMMAND_PARSE_SOLAR_DATA: &str = "parse_solar_data";

/// Backend command that answers a graph state request.
pub const COMMAND_RETRIEVE_SOLAR_DATA: &str = "retrieve_solar_data";

/// Argument record for [`COMMAND_PARSE_SOLAR_DATA`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseSolarDataArgs {
    /// Original file name as reported by the picker
    pub name: String,
    /// Full text content of the file
    pub data: String,
}

/// Argument record for [`COMMAND_RETRIEVE_SOLAR_DATA`]
///
/// The request itself is opaque to the front-end glue and travels as a JSON string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveSolarDataArgs {
    pub graph_state_request: String,
}

// ============================================================================
// Events
// ============================================================================

/// Backend-originated notifications the front-end listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendEvent {
    /// A `parse_solar_data` run finished
    SolarParseComplete,
    /// A `retrieve_solar_data` request finished
    DataRequestComplete,
}

impl BackendEvent {
    pub const ALL: [BackendEvent; 2] = [
        BackendEvent::SolarParseComplete,
        BackendEvent::DataRequestComplete,
    ];

    /// Event name on the wire. The forwarded DOM event uses the same name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SolarParseComplete => "solar_parse_complete",
            Self::DataRequestComplete => "data_request_complete",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.as_str() == name)
    }
}

// ============================================================================
// Files
// ============================================================================

/// The only MIME type accepted for ingestion.
pub const CSV_MIME: &str = "text/csv";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_args_serialize_with_backend_keys() {
        let args = ParseSolarDataArgs {
            name: "june.csv".to_string(),
            data: "a,b\n1,2".to_string(),
        };

        let json = serde_json::to_value(&args).unwrap();
        assert_eq!(json, serde_json::json!({"name": "june.csv", "data": "a,b\n1,2"}));
    }

    #[test]
    fn retrieve_args_use_camel_case_key() {
        let args = RetrieveSolarDataArgs {
            graph_state_request: "{}".to_string(),
        };

        let json = serde_json::to_string(&args).unwrap();
        assert_eq!(json, r#"{"graphStateRequest":"{}"}"#);
    }

    #[test]
    fn backend_event_names_match_wire_format() {
        for event in BackendEvent::ALL {
            let json = serde_json::to_value(event).unwrap();
            assert_eq!(json.as_str(), Some(event.as_str()));
            assert_eq!(BackendEvent::from_name(event.as_str()), Some(event));
        }
        assert_eq!(BackendEvent::from_name("parse_complete"), None);
    }
}

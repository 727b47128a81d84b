// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed events carried by the analysis stream.
//!
//! The backend emits one JSON object per `data: ` line. Each object is
//! dispatched on its `type` field into a closed [`StreamEvent`] variant.
//! Objects of an unknown type, or whose fields do not match their type,
//! are rejected here and skipped by the consumer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::progress::Stage;
use crate::types::AnalysisResult;

/// Marker preceding every event payload on the wire.
pub const DATA_PREFIX: &str = "data: ";

const KNOWN_TYPES: [&str; 5] = [
    "status",
    "quick_preview",
    "classification",
    "final_results",
    "error",
];

/// One decoded unit of the analysis stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// The backend moved to a new phase.
    Status {
        stage: Stage,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Fast, low-fidelity preview of the analysis.
    QuickPreview { content: String },
    /// Preliminary genre/period classification.
    Classification {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        genre: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        period: Option<String>,
    },
    /// The complete analysis. Terminal.
    FinalResults { results: AnalysisResult },
    /// Server-reported failure. Terminal.
    Error { message: String },
}

impl StreamEvent {
    /// True for events after which no further event is processed.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamEvent::FinalResults { .. } | StreamEvent::Error { .. }
        )
    }

    /// Wire name of the event type.
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Status { .. } => "status",
            StreamEvent::QuickPreview { .. } => "quick_preview",
            StreamEvent::Classification { .. } => "classification",
            StreamEvent::FinalResults { .. } => "final_results",
            StreamEvent::Error { .. } => "error",
        }
    }
}

/// Why a `data: ` line did not produce an event.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventDecodeError {
    /// Well-formed JSON with a `type` this client does not handle.
    #[error("unknown event type `{0}`")]
    UnknownType(String),

    /// Invalid JSON, a missing `type`, or fields that do not fit the type.
    #[error("malformed event: {0}")]
    Malformed(String),
}

/// Decodes one line of the stream.
///
/// Returns `None` for lines that carry no event (blank lines, comments,
/// `event:`/`id:` fields). A trailing `\r` is ignored.
pub fn decode_line(line: &str) -> Option<Result<StreamEvent, EventDecodeError>> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let payload = line.strip_prefix(DATA_PREFIX)?;
    Some(decode_payload(payload))
}

fn decode_payload(payload: &str) -> Result<StreamEvent, EventDecodeError> {
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| EventDecodeError::Malformed(e.to_string()))?;

    let kind = value
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or_else(|| EventDecodeError::Malformed("missing `type` field".into()))?;

    if !KNOWN_TYPES.contains(&kind) {
        return Err(EventDecodeError::UnknownType(kind.to_string()));
    }

    serde_json::from_value(value).map_err(|e| EventDecodeError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_status_event() {
        let event = decode_line(r#"data: {"type":"status","stage":"quick_preview"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            event,
            StreamEvent::Status {
                stage: Stage::QuickPreview,
                message: None
            }
        );
        assert!(!event.is_terminal());
    }

    #[test]
    fn decodes_final_results_with_embedded_result() {
        let line = r#"data: {"type":"final_results","results":{"summary":"A royal dedication","language":"en","tabs":[{"name":"Period","content":"Ur III"}]}}"#;
        let event = decode_line(line).unwrap().unwrap();
        match event {
            StreamEvent::FinalResults { ref results } => {
                assert_eq!(results.summary, "A royal dedication");
                assert_eq!(results.tabs.len(), 1);
                assert_eq!(results.tabs[0].content, "Ur III");
            }
            ref other => panic!("expected FinalResults, got {other:?}"),
        }
        assert!(event.is_terminal());
    }

    #[test]
    fn non_data_lines_carry_no_event() {
        assert!(decode_line("").is_none());
        assert!(decode_line(": keep-alive").is_none());
        assert!(decode_line("event: status").is_none());
    }

    #[test]
    fn carriage_return_is_ignored() {
        let event = decode_line("data: {\"type\":\"error\",\"message\":\"quota\"}\r")
            .unwrap()
            .unwrap();
        assert_eq!(
            event,
            StreamEvent::Error {
                message: "quota".into()
            }
        );
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = decode_line("data: {not json").unwrap().unwrap_err();
        assert!(matches!(err, EventDecodeError::Malformed(_)));
    }

    #[test]
    fn missing_fields_are_malformed() {
        let err = decode_line(r#"data: {"type":"quick_preview"}"#)
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, EventDecodeError::Malformed(_)));

        let err = decode_line(r#"data: {"stage":"analyzing"}"#)
            .unwrap()
            .unwrap_err();
        assert_eq!(err, EventDecodeError::Malformed("missing `type` field".into()));
    }

    #[test]
    fn unknown_stage_is_malformed() {
        let err = decode_line(r#"data: {"type":"status","stage":"translating"}"#)
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, EventDecodeError::Malformed(_)));
    }

    #[test]
    fn unknown_type_is_reported_separately() {
        let err = decode_line(r#"data: {"type":"complete"}"#)
            .unwrap()
            .unwrap_err();
        assert_eq!(err, EventDecodeError::UnknownType("complete".into()));
    }

    #[test]
    fn classification_fields_are_optional() {
        let event = decode_line(r#"data: {"type":"classification","genre":"Royal inscription"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            event,
            StreamEvent::Classification {
                genre: Some("Royal inscription".into()),
                period: None
            }
        );
        assert_eq!(event.kind(), "classification");
    }
}

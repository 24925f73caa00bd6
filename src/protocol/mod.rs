//! JSON-lines protocol spoken with the orchestrator.
//!
//! One request per line in, one response per line out. Malformed requests
//! produce an `{"error": ...}` response rather than ending the session.

pub mod request;

pub use request::{parse_request, MovementRequest, ProtocolError, Request, RetreatRequest};

use serde::Serialize;
use tracing::warn;

use crate::adjudicator::Adjudicator;
use crate::resolve::{AdjudicationResult, RetreatOutcome};

/// A response line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Movement(AdjudicationResult),
    Retreat(RetreatOutcome),
    Error { error: String },
}

/// Handles one input line. Blank lines produce no response.
pub fn handle_line(adjudicator: &Adjudicator, line: &str) -> Option<Response> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let response = match parse_request(line) {
        Ok(Request::Movement(m)) => Response::Movement(adjudicator.adjudicate(&m.units, &m.orders)),
        Ok(Request::Retreat(r)) => {
            Response::Retreat(adjudicator.resolve_retreats(&r.units, &r.dislodged, &r.orders))
        }
        Err(e) => {
            warn!(error = %e, "rejecting request");
            Response::Error {
                error: e.to_string(),
            }
        }
    };
    Some(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped() {
        let adj = Adjudicator::standard().unwrap();
        assert_eq!(handle_line(&adj, "   "), None);
    }

    #[test]
    fn errors_are_responses() {
        let adj = Adjudicator::standard().unwrap();
        let resp = handle_line(&adj, "not json").unwrap();
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json["error"].as_str().unwrap().starts_with("malformed request"));
    }

    #[test]
    fn movement_round_trip() {
        let adj = Adjudicator::standard().unwrap();
        let line = r#"{"units": [{"id": "a", "country": "france", "type": "army", "territory": "PAR"}],
                       "orders": [{"unit_id": "a", "action": "move", "target": "BUR"}]}"#;
        let json = serde_json::to_value(handle_line(&adj, line).unwrap()).unwrap();
        assert_eq!(json["newUnits"][0]["territory"], "BUR");
        assert_eq!(json["dislodgedUnits"], serde_json::json!([]));
    }
}

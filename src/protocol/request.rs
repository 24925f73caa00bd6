//! Request parsing.
//!
//! Each request is one JSON object on one line. A movement request carries
//! `units` and optional `orders`; a retreat request nests its payload under
//! `retreat`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{RawOrder, Unit};
use crate::resolve::{DislodgedUnit, RetreatOrder};

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request must be a JSON object")]
    NotAnObject,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MovementRequest {
    pub units: Vec<Unit>,
    #[serde(default)]
    pub orders: Vec<RawOrder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RetreatRequest {
    pub dislodged: Vec<DislodgedUnit>,
    #[serde(default)]
    pub orders: Vec<RetreatOrder>,
    /// Post-movement board; may be omitted when only the retreating units
    /// are of interest.
    #[serde(default)]
    pub units: Vec<Unit>,
}

/// A parsed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Movement(MovementRequest),
    Retreat(RetreatRequest),
}

#[derive(Deserialize)]
struct RetreatEnvelope {
    retreat: RetreatRequest,
}

/// Parses one request line.
pub fn parse_request(line: &str) -> Result<Request, ProtocolError> {
    let value: serde_json::Value = serde_json::from_str(line)?;
    let Some(object) = value.as_object() else {
        return Err(ProtocolError::NotAnObject);
    };
    if object.contains_key("retreat") {
        let envelope: RetreatEnvelope = serde_json::from_value(value)?;
        Ok(Request::Retreat(envelope.retreat))
    } else {
        Ok(Request::Movement(serde_json::from_value(value)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_request_orders_are_optional() {
        let req = parse_request(
            r#"{"units": [{"id": "a", "country": "france", "type": "army", "territory": "PAR"}]}"#,
        )
        .unwrap();
        match req {
            Request::Movement(m) => {
                assert_eq!(m.units.len(), 1);
                assert!(m.orders.is_empty());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn retreat_request_is_recognized() {
        let line = r#"{"retreat": {"dislodged": [{
            "unit": {"id": "a", "country": "france", "type": "army", "territory": "PAR", "dislodged": true},
            "fromTerritory": "PAR", "attackerTerritory": "BUR", "validRetreats": ["PIC"]
        }], "orders": [{"unit_id": "a", "target": "PIC"}]}}"#;
        match parse_request(line).unwrap() {
            Request::Retreat(r) => {
                assert_eq!(r.dislodged.len(), 1);
                assert_eq!(r.orders[0].target, "PIC");
                assert!(r.units.is_empty());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(matches!(parse_request("{"), Err(ProtocolError::Json(_))));
        assert!(matches!(parse_request("[1, 2]"), Err(ProtocolError::NotAnObject)));
        assert!(matches!(parse_request(r#"{"orders": []}"#), Err(ProtocolError::Json(_))));
    }
}

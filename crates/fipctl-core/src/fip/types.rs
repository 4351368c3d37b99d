//! Wire types for the FIP endpoints.
//!
//! Serialized as JSON over the control-plane socket. Both the client and
//! the mock control plane in the test-utils crate use these types.

use serde::{Deserialize, Serialize};

/// One floating IP as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FipResource {
    /// The address itself. Unique within the control plane; never empty
    /// for a resource the server returned.
    pub ip: String,

    /// Human-readable label. The server omits the field for unnamed
    /// addresses; empty means unset.
    #[serde(default)]
    pub name: String,
}

/// Body of the name operation: `{"name": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fip_resource_round_trips_through_json() {
        let fip = FipResource {
            ip: "203.0.113.7".to_string(),
            name: "edge-lb".to_string(),
        };
        let json = serde_json::to_string(&fip).unwrap();
        let back: FipResource = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fip);
    }

    #[test]
    fn missing_name_decodes_as_empty() {
        let fip: FipResource = serde_json::from_str(r#"{"ip":"203.0.113.7"}"#).unwrap();
        assert_eq!(fip.ip, "203.0.113.7");
        assert_eq!(fip.name, "");
    }

    #[test]
    fn name_request_wire_shape() {
        let body = serde_json::to_string(&NameRequest {
            name: "edge-lb".to_string(),
        })
        .unwrap();
        assert_eq!(body, r#"{"name":"edge-lb"}"#);
    }
}

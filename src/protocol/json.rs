//! JSON payloads of the host protocol.
//!
//! The host sends a [`Snapshot`] after `turn`; the bot answers with the
//! commands it issued as a JSON array after `orders`.

use crate::world::{Command, Snapshot};

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("turn sent without a snapshot")]
    MissingPayload,
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses a snapshot sent with `turn`.
pub fn parse_snapshot(json: &str) -> Result<Snapshot, ProtocolError> {
    let json = json.trim();
    if json.is_empty() {
        return Err(ProtocolError::MissingPayload);
    }
    Ok(serde_json::from_str(json)?)
}

/// Renders commands as the JSON array sent with `orders`.
pub fn format_orders(commands: &[Command]) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(commands)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Location, ObjectId, Owner};

    const MINIMAL: &str = r#"{
        "turn": 7,
        "me": {
            "castle": {
                "id": 1, "owner": "me", "location": {"row": 2000, "col": 600}, "health": 80
            },
            "elves": [{
                "id": 3, "owner": "me", "location": {"row": 2000, "col": 900},
                "health": 10, "attack_range": 200
            }]
        },
        "enemy": {
            "castle": {
                "id": 2, "owner": "enemy", "location": {"row": 2000, "col": 5800}, "health": 80
            }
        }
    }"#;

    #[test]
    fn parses_minimal_snapshot() {
        let snapshot = parse_snapshot(MINIMAL).unwrap();
        assert_eq!(snapshot.turn, 7);
        assert_eq!(snapshot.me.elves.len(), 1);
        assert_eq!(snapshot.me.elves[0].id, ObjectId(3));
        assert!(snapshot.me.portals.is_empty());
        assert_eq!(snapshot.enemy.castle.owner, Owner::Enemy);
        assert_eq!(snapshot.enemy.castle.location, Location::new(2000, 5800));
    }

    #[test]
    fn empty_payload_is_missing() {
        assert!(matches!(
            parse_snapshot("  "),
            Err(ProtocolError::MissingPayload)
        ));
    }

    #[test]
    fn garbage_is_json_error() {
        assert!(matches!(
            parse_snapshot("{\"turn\": 1}"),
            Err(ProtocolError::Json(_))
        ));
        assert!(matches!(parse_snapshot("not json"), Err(ProtocolError::Json(_))));
    }

    #[test]
    fn orders_are_a_json_array() {
        assert_eq!(format_orders(&[]).unwrap(), "[]");
        let orders = format_orders(&[
            Command::BuildPortal { elf: ObjectId(3) },
            Command::SummonIceTroll { portal: ObjectId(9) },
        ])
        .unwrap();
        assert_eq!(
            orders,
            r#"[{"command":"build_portal","elf":3},{"command":"summon_ice_troll","portal":9}]"#
        );
    }
}

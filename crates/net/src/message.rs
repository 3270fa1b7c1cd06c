use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Everything that travels over the presence socket, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    #[serde(rename = "updateLocation")]
    UpdateLocation(UpdateLocation),
}

/// Presence update for one player, sent and received symmetrically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocation {
    pub auth_token: String,
    /// Display name, also the stable identity key.
    pub user_id: String,
    pub player_type: String,
    pub area: String,
    /// Coarse grid cell, position divided by the chunk size and floored.
    pub chunk: [i32; 2],
    pub position: [f32; 2],
    /// Empty when no emotion is active.
    pub emotion: String,
    /// Asks the server to re-evaluate chunk subscriptions.
    pub update_chunk: bool,
}

impl Message {
    pub fn decode(raw: &str) -> Result<Self, NetError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn encode(&self) -> Result<String, NetError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_camel_case_update_location() {
        let raw = r#"{
            "type": "updateLocation",
            "authToken": "",
            "userId": "alice",
            "playerType": "explorer",
            "area": "campus",
            "chunk": [0, -1],
            "position": [3.5, -12.0],
            "emotion": "",
            "updateChunk": false
        }"#;
        let Message::UpdateLocation(msg) = Message::decode(raw).unwrap();
        assert_eq!(msg.user_id, "alice");
        assert_eq!(msg.chunk, [0, -1]);
        assert_eq!(msg.position, [3.5, -12.0]);
        assert!(!msg.update_chunk);
    }

    #[test]
    fn rejects_unknown_type_and_garbage() {
        assert!(Message::decode(r#"{"type": "teleport"}"#).is_err());
        assert!(Message::decode("not json").is_err());
    }

    #[test]
    fn encode_uses_wire_field_names() {
        let msg = Message::UpdateLocation(UpdateLocation {
            auth_token: String::new(),
            user_id: "bob".into(),
            player_type: "ta".into(),
            area: "campus".into(),
            chunk: [1, 2],
            position: [25.0, 41.0],
            emotion: "happy".into(),
            update_chunk: true,
        });
        let encoded = msg.encode().unwrap();
        assert!(encoded.contains(r#""type":"updateLocation""#));
        assert!(encoded.contains(r#""userId":"bob""#));
        assert!(encoded.contains(r#""updateChunk":true"#));

        let decoded = Message::decode(&encoded).unwrap();
        assert_eq!(decoded, msg);
    }
}

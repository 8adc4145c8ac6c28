use serde::Serialize;

use super::TransportError;
use crate::domain::ApiKey;

#[derive(Debug, Serialize)]
struct KeyOnlyEnvelope<'a> {
    key: &'a str,
}

pub fn encode_ping(key: &ApiKey) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(KeyOnlyEnvelope { key: key.as_str() })
}

/// `users/ping` answers with a bare JSON string (`"PONG!"`).
pub fn decode_ping_json_response(json: &str) -> Result<String, TransportError> {
    Ok(serde_json::from_str(json)?)
}

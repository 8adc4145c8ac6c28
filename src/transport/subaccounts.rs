use serde::Serialize;

use super::TransportError;
use crate::domain::{ApiKey, Subaccount, SubaccountId, SubaccountSpec};

#[derive(Debug, Serialize)]
struct SubaccountSpecEnvelope<'a> {
    key: &'a str,
    #[serde(flatten)]
    spec: &'a SubaccountSpec,
}

#[derive(Debug, Serialize)]
struct SubaccountIdEnvelope<'a> {
    key: &'a str,
    id: &'a SubaccountId,
}

#[derive(Debug, Serialize)]
struct ListSubaccountsEnvelope<'a> {
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    q: Option<&'a str>,
}

/// Envelope for `subaccounts/add` and `subaccounts/update`.
pub fn encode_subaccount_spec(
    key: &ApiKey,
    spec: &SubaccountSpec,
) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(SubaccountSpecEnvelope {
        key: key.as_str(),
        spec,
    })
}

/// Envelope for `subaccounts/info`, `delete`, `pause` and `resume`.
pub fn encode_subaccount_id(
    key: &ApiKey,
    id: &SubaccountId,
) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(SubaccountIdEnvelope {
        key: key.as_str(),
        id,
    })
}

/// `query` filters by id or name prefix.
pub fn encode_list_subaccounts(
    key: &ApiKey,
    query: Option<&str>,
) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(ListSubaccountsEnvelope {
        key: key.as_str(),
        q: query,
    })
}

pub fn decode_subaccount_json_response(json: &str) -> Result<Subaccount, TransportError> {
    Ok(serde_json::from_str(json)?)
}

pub fn decode_subaccounts_json_response(json: &str) -> Result<Vec<Subaccount>, TransportError> {
    Ok(serde_json::from_str(json)?)
}

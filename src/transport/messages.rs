use serde::{Deserialize, Serialize};

use super::TransportError;
use crate::domain::{
    ApiKey, DeliveryOptions, Message, RejectReason, SendMessage, SendResult, SendStatus,
    SendTemplate, TemplateName, Variable,
};

#[derive(Debug, Serialize)]
struct SendEnvelope<'a> {
    key: &'a str,
    message: &'a Message,
    #[serde(flatten)]
    delivery: &'a DeliveryOptions,
}

#[derive(Debug, Serialize)]
struct SendTemplateEnvelope<'a> {
    key: &'a str,
    template_name: &'a TemplateName,
    template_content: &'a [Variable],
    message: &'a Message,
    #[serde(flatten)]
    delivery: &'a DeliveryOptions,
}

#[derive(Debug, Clone, Deserialize)]
struct SendJsonResult {
    email: String,
    status: String,
    #[serde(default)]
    reject_reason: Option<String>,
    #[serde(rename = "_id")]
    id: String,
}

pub fn encode_send_message(
    key: &ApiKey,
    request: &SendMessage,
) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(SendEnvelope {
        key: key.as_str(),
        message: &request.message,
        delivery: &request.delivery,
    })
}

pub fn encode_send_template(
    key: &ApiKey,
    request: &SendTemplate,
) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(SendTemplateEnvelope {
        key: key.as_str(),
        template_name: &request.template_name,
        template_content: &request.template_content,
        message: &request.message,
        delivery: &request.delivery,
    })
}

/// Decode the per-recipient result array returned by both send endpoints.
pub fn decode_send_json_response(json: &str) -> Result<Vec<SendResult>, TransportError> {
    let parsed: Vec<SendJsonResult> = serde_json::from_str(json)?;

    parsed
        .into_iter()
        .map(|item| -> Result<SendResult, TransportError> {
            let status = SendStatus::from_wire(&item.status)
                .ok_or(TransportError::UnknownSendStatus { value: item.status })?;
            let reject_reason = match item.reject_reason.as_deref() {
                None | Some("") => None,
                Some(value) => Some(RejectReason::from_wire(value).ok_or_else(|| {
                    TransportError::UnknownRejectReason {
                        value: value.to_owned(),
                    }
                })?),
            };
            Ok(SendResult {
                email: item.email,
                status,
                reject_reason,
                id: item.id,
            })
        })
        .collect()
}

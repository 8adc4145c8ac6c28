use serde::Serialize;

use super::TransportError;
use crate::domain::{ApiKey, Template, TemplateName, TemplateSpec};

#[derive(Debug, Serialize)]
struct TemplateSpecEnvelope<'a> {
    key: &'a str,
    #[serde(flatten)]
    spec: &'a TemplateSpec,
}

#[derive(Debug, Serialize)]
struct TemplateNameEnvelope<'a> {
    key: &'a str,
    name: &'a TemplateName,
}

#[derive(Debug, Serialize)]
struct ListTemplatesEnvelope<'a> {
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'a str>,
}

/// Envelope for `templates/add` and `templates/update`.
pub fn encode_template_spec(
    key: &ApiKey,
    spec: &TemplateSpec,
) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(TemplateSpecEnvelope {
        key: key.as_str(),
        spec,
    })
}

/// Envelope for `templates/info`, `templates/delete` and `templates/publish`.
pub fn encode_template_name(
    key: &ApiKey,
    name: &TemplateName,
) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(TemplateNameEnvelope {
        key: key.as_str(),
        name,
    })
}

pub fn encode_list_templates(
    key: &ApiKey,
    label: Option<&str>,
) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(ListTemplatesEnvelope {
        key: key.as_str(),
        label,
    })
}

pub fn decode_template_json_response(json: &str) -> Result<Template, TransportError> {
    Ok(serde_json::from_str(json)?)
}

pub fn decode_templates_json_response(json: &str) -> Result<Vec<Template>, TransportError> {
    Ok(serde_json::from_str(json)?)
}

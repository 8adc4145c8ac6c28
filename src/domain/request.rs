use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::value::{SendAt, SubaccountId, TemplateName};
use crate::domain::vars::{Variable, VariableSource, to_variable_list};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Header a recipient is listed under.
pub enum RecipientType {
    #[default]
    To,
    Cc,
    Bcc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A single recipient of a [`Message`].
pub struct Recipient {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: RecipientType,
}

impl Recipient {
    /// A `to` recipient without a display name.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            kind: RecipientType::To,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeLanguage {
    Mailchimp,
    Handlebars,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Merge variables overriding the global ones for one recipient.
pub struct RecipientVariables {
    pub rcpt: String,
    pub vars: Vec<Variable>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Metadata overriding the global message metadata for one recipient.
pub struct RecipientMetadata {
    pub rcpt: String,
    pub values: BTreeMap<String, serde_json::Value>,
}

impl RecipientMetadata {
    pub fn new(
        rcpt: impl Into<String>,
        values: impl IntoIterator<Item = (String, serde_json::Value)>,
    ) -> Self {
        Self {
            rcpt: rcpt.into(),
            values: values.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Attachment or inline image; `content` is base64-encoded.
pub struct Attachment {
    #[serde(rename = "type")]
    pub mime_type: String,
    pub name: String,
    pub content: String,
}

impl Attachment {
    pub fn new(
        mime_type: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            mime_type: mime_type.into(),
            name: name.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Message payload nested under `message` in the send envelopes.
///
/// Scheduling and pool selection are not part of this type; they travel in
/// [`DeliveryOptions`] and are written at the envelope root.
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    #[serde(default)]
    pub to: Vec<Recipient>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub important: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_opens: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_clicks: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_text: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_html: Option<bool>,
    /// Only honored by Mandrill for HTML documents under 256KB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_css: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_strip_qs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_recipients: Option<bool>,
    /// `Some(false)` disables content logging for sensitive emails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_content_link: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_path_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_language: Option<MergeLanguage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_merge_vars: Vec<Variable>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merge_vars: Vec<RecipientVariables>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Must name an existing subaccount or the send fails with `Unknown_Subaccount`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subaccount: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub google_analytics_domains: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_analytics_campaign: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipient_metadata: Vec<RecipientMetadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Attachment>,
}

impl Message {
    /// Append a recipient. An empty `name` is sent without a display name.
    pub fn add_recipient(
        &mut self,
        email: impl Into<String>,
        name: impl Into<String>,
        kind: RecipientType,
    ) {
        let name = name.into();
        self.to.push(Recipient {
            email: email.into(),
            name: (!name.is_empty()).then_some(name),
            kind,
        });
    }

    /// Replace the global merge variables.
    pub fn set_global_merge_vars(&mut self, source: impl Into<VariableSource>) {
        self.global_merge_vars = to_variable_list(source);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Send settings that Mandrill reads from the envelope root, beside `message`.
pub struct DeliveryOptions {
    /// Background sending mode; every recipient comes back as `queued`.
    #[serde(rename = "async", skip_serializing_if = "std::ops::Not::not")]
    pub asynchronous: bool,
    /// Dedicated IP pool; unknown pools fall back to the default pool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_pool: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_at: Option<SendAt>,
}

#[derive(Debug, Clone, Default)]
/// Request for `messages/send`.
pub struct SendMessage {
    pub message: Message,
    pub delivery: DeliveryOptions,
}

impl SendMessage {
    pub fn new(message: Message) -> Self {
        Self {
            message,
            delivery: DeliveryOptions::default(),
        }
    }

    pub fn with_delivery(mut self, delivery: DeliveryOptions) -> Self {
        self.delivery = delivery;
        self
    }
}

#[derive(Debug, Clone)]
/// Request for `messages/send-template`.
pub struct SendTemplate {
    pub template_name: TemplateName,
    /// Content for the template's editable regions.
    pub template_content: Vec<Variable>,
    pub message: Message,
    pub delivery: DeliveryOptions,
}

impl SendTemplate {
    pub fn new(
        template_name: TemplateName,
        template_content: impl Into<VariableSource>,
        message: Message,
    ) -> Self {
        Self {
            template_name,
            template_content: to_variable_list(template_content),
            message,
            delivery: DeliveryOptions::default(),
        }
    }

    pub fn with_delivery(mut self, delivery: DeliveryOptions) -> Self {
        self.delivery = delivery;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Writable template fields sent to `templates/add` and `templates/update`.
pub struct TemplateSpec {
    pub name: TemplateName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// HTML body; may contain `mc:edit` regions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Publish immediately instead of saving a draft.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

impl TemplateSpec {
    pub fn new(name: TemplateName) -> Self {
        Self {
            name,
            from_email: None,
            from_name: None,
            subject: None,
            code: None,
            text: None,
            publish: None,
            labels: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Writable subaccount fields sent to `subaccounts/add` and `subaccounts/update`.
pub struct SubaccountSpec {
    pub id: SubaccountId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Manual hourly quota; `None` lets Mandrill compute it from reputation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_quota: Option<u32>,
}

impl SubaccountSpec {
    pub fn new(id: SubaccountId) -> Self {
        Self {
            id,
            name: None,
            notes: None,
            custom_quota: None,
        }
    }
}

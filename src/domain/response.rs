use serde::Deserialize;

use crate::domain::value::KnownErrorName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendStatus {
    Sent,
    Queued,
    Scheduled,
    Rejected,
    Invalid,
}

impl SendStatus {
    pub fn from_wire(value: &str) -> Option<Self> {
        Some(match value {
            "sent" => Self::Sent,
            "queued" => Self::Queued,
            "scheduled" => Self::Scheduled,
            "rejected" => Self::Rejected,
            "invalid" => Self::Invalid,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Queued => "queued",
            Self::Scheduled => "scheduled",
            Self::Rejected => "rejected",
            Self::Invalid => "invalid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    HardBounce,
    SoftBounce,
    Spam,
    Unsub,
    Custom,
    InvalidSender,
    Invalid,
    TestModeLimit,
    Unsigned,
    Rule,
}

impl RejectReason {
    pub fn from_wire(value: &str) -> Option<Self> {
        Some(match value {
            "hard-bounce" => Self::HardBounce,
            "soft-bounce" => Self::SoftBounce,
            "spam" => Self::Spam,
            "unsub" => Self::Unsub,
            "custom" => Self::Custom,
            "invalid-sender" => Self::InvalidSender,
            "invalid" => Self::Invalid,
            "test-mode-limit" => Self::TestModeLimit,
            "unsigned" => Self::Unsigned,
            "rule" => Self::Rule,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HardBounce => "hard-bounce",
            Self::SoftBounce => "soft-bounce",
            Self::Spam => "spam",
            Self::Unsub => "unsub",
            Self::Custom => "custom",
            Self::InvalidSender => "invalid-sender",
            Self::Invalid => "invalid",
            Self::TestModeLimit => "test-mode-limit",
            Self::Unsigned => "unsigned",
            Self::Rule => "rule",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Per-recipient outcome of a send call.
pub struct SendResult {
    pub email: String,
    pub status: SendStatus,
    pub reject_reason: Option<RejectReason>,
    /// Mandrill's unique message id (`_id`).
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
/// Template as stored by Mandrill. Every field is server-provided.
pub struct Template {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub from_email: Option<String>,
    #[serde(default)]
    pub from_name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub publish_name: Option<String>,
    #[serde(default)]
    pub publish_code: Option<String>,
    #[serde(default)]
    pub publish_subject: Option<String>,
    #[serde(default)]
    pub publish_from_email: Option<String>,
    #[serde(default)]
    pub publish_from_name: Option<String>,
    #[serde(default)]
    pub publish_text: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Template {
    /// `true` once the template has a published version.
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubaccountStatus {
    Active,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Subaccount as reported by Mandrill. Send counters are computed server-side.
pub struct Subaccount {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub custom_quota: Option<u32>,
    #[serde(default)]
    pub reputation: u32,
    pub status: SubaccountStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub first_sent_at: Option<String>,
    #[serde(default)]
    pub hourly_quota: Option<u32>,
    #[serde(default)]
    pub sent_hourly: u64,
    #[serde(default)]
    pub sent_weekly: u64,
    #[serde(default)]
    pub sent_monthly: u64,
    #[serde(default)]
    pub sent_total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, thiserror::Error)]
#[error("{message}")]
/// Structured error returned by Mandrill with an HTTP status of 400 or above.
///
/// All fields are kept verbatim; the display string is `message`.
pub struct ApiError {
    pub status: String,
    pub code: i32,
    pub name: String,
    pub message: String,
}

impl ApiError {
    /// Documented kind for `name`, if it is one Mandrill documents.
    pub fn known_kind(&self) -> Option<KnownErrorName> {
        KnownErrorName::from_name(&self.name)
    }
}

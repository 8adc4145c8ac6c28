use serde::Serialize;

use crate::domain::validation::ValidationError;

#[derive(Clone, PartialEq, Eq, Hash)]
/// Mandrill API key (`key`).
///
/// Invariant: not blank. The value is kept exactly as given, since Mandrill and
/// the sandbox tokens compare it verbatim. `Debug` output is redacted.
pub struct ApiKey(String);

impl ApiKey {
    /// Envelope field name used by Mandrill (`key`).
    pub const FIELD: &'static str = "key";

    /// Environment variable read by [`ApiKey::from_env`].
    pub const ENV_VAR: &'static str = "MANDRILL_API_KEY";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Read the key from `MANDRILL_API_KEY`.
    pub fn from_env() -> Result<Self, ValidationError> {
        let value = std::env::var(Self::ENV_VAR)
            .map_err(|_| ValidationError::MissingEnv { var: Self::ENV_VAR })?;
        Self::new(value)
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
/// Template name or slug, as accepted by the `templates/*` endpoints (`name`).
///
/// Invariant: non-empty after trimming.
pub struct TemplateName(String);

impl TemplateName {
    /// Envelope field name used by Mandrill (`name`).
    pub const FIELD: &'static str = "name";

    /// Create a validated [`TemplateName`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
/// Subaccount identifier (`id`).
///
/// Invariant: non-empty after trimming.
pub struct SubaccountId(String);

impl SubaccountId {
    /// Envelope field name used by Mandrill (`id`).
    pub const FIELD: &'static str = "id";

    /// Create a validated [`SubaccountId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
/// Scheduled send time (`send_at`), a UTC timestamp in `YYYY-MM-DD HH:MM:SS` format.
///
/// Invariant: matches the layout above (digits and separators are checked, ranges are not;
/// Mandrill sends immediately for times in the past).
pub struct SendAt(String);

impl SendAt {
    /// Envelope field name used by Mandrill (`send_at`).
    pub const FIELD: &'static str = "send_at";

    /// Create a validated [`SendAt`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if !is_send_at_layout(trimmed) {
            return Err(ValidationError::InvalidSendAt {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated timestamp.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_send_at_layout(value: &str) -> bool {
    const LAYOUT: &[u8] = b"dddd-dd-dd dd:dd:dd";

    let bytes = value.as_bytes();
    bytes.len() == LAYOUT.len()
        && bytes.iter().zip(LAYOUT).all(|(byte, expected)| match expected {
            b'd' => byte.is_ascii_digit(),
            other => byte == other,
        })
}

/// Error `name` values documented by Mandrill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownErrorName {
    /// `Invalid_Key`: the provided API key is not valid.
    InvalidKey,
    /// `PaymentRequired`: the requested feature requires payment.
    PaymentRequired,
    /// `Unknown_Subaccount`: the provided subaccount id does not exist.
    UnknownSubaccount,
    /// `Unknown_Template`: the requested template does not exist.
    UnknownTemplate,
    /// `ValidationError`: the parameters passed to the call are invalid.
    ValidationError,
    /// `GeneralError`: an unexpected error occurred on the Mandrill side.
    GeneralError,
}

impl KnownErrorName {
    /// Map the raw `name` field to a known kind.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Invalid_Key" => Self::InvalidKey,
            "PaymentRequired" => Self::PaymentRequired,
            "Unknown_Subaccount" => Self::UnknownSubaccount,
            "Unknown_Template" => Self::UnknownTemplate,
            "ValidationError" => Self::ValidationError,
            "GeneralError" => Self::GeneralError,
            _ => return None,
        })
    }

    /// Wire spelling of this name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidKey => "Invalid_Key",
            Self::PaymentRequired => "PaymentRequired",
            Self::UnknownSubaccount => "Unknown_Subaccount",
            Self::UnknownTemplate => "Unknown_Template",
            Self::ValidationError => "ValidationError",
            Self::GeneralError => "GeneralError",
        }
    }

    /// `true` when the error is caused by the credential rather than the request.
    pub fn is_auth_error(self) -> bool {
        matches!(self, Self::InvalidKey | Self::PaymentRequired)
    }
}

//! Transport layer: envelope shapes and wire-format details (serialization/deserialization).

mod error;
mod messages;
mod subaccounts;
mod templates;
mod users;

pub use error::decode_api_error;
pub use messages::{decode_send_json_response, encode_send_message, encode_send_template};
pub use subaccounts::{
    decode_subaccount_json_response, decode_subaccounts_json_response, encode_list_subaccounts,
    encode_subaccount_id, encode_subaccount_spec,
};
pub use templates::{
    decode_template_json_response, decode_templates_json_response, encode_list_templates,
    encode_template_name, encode_template_spec,
};
pub use users::{decode_ping_json_response, encode_ping};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response contains unknown send status: {value}")]
    UnknownSendStatus { value: String },

    #[error("response contains unknown reject reason: {value}")]
    UnknownRejectReason { value: String },

    #[error("HTTP {status} with undecodable error body: {source}")]
    ErrorBody {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

//! Typed Rust client for the Mandrill transactional email HTTP API.
//!
//! The crate is split into a domain layer of strong types, a transport layer for
//! envelope shapes and wire-format quirks, and a small client layer that issues
//! one `POST` per call and sorts the answer into a result or a typed error.
//!
//! ```rust,no_run
//! use mandrill::{ApiKey, MandrillClient, Message, RecipientType, SendMessage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mandrill::MandrillError> {
//!     let client = MandrillClient::new(ApiKey::new("...")?);
//!
//!     let mut message = Message {
//!         from_email: Some("kyle@example.com".to_owned()),
//!         subject: Some("You won the prize!".to_owned()),
//!         html: Some("<h1>You won!!</h1>".to_owned()),
//!         ..Default::default()
//!     };
//!     message.add_recipient("bob@example.com", "Bob Johnson", RecipientType::To);
//!
//!     let results = client.send_message(&SendMessage::new(message)).await?;
//!     println!("{results:?}");
//!     Ok(())
//! }
//! ```
//!
//! For integration tests, the keys `SANDBOX_SUCCESS` and `SANDBOX_ERROR` make the
//! send calls succeed or fail without touching the network (see [`SandboxMode`]).
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{MandrillClient, MandrillClientBuilder, MandrillError, SandboxMode};
pub use domain::{
    ApiError, ApiKey, Attachment, DeliveryOptions, KnownErrorName, MergeLanguage, Message,
    Recipient, RecipientMetadata, RecipientType, RecipientVariables, RejectReason, SendAt,
    SendMessage, SendResult, SendStatus, SendTemplate, Subaccount, SubaccountId, SubaccountSpec,
    SubaccountStatus, Template, TemplateName, TemplateSpec, ValidationError, Variable,
    VariableSource, for_recipient, to_variable_list,
};

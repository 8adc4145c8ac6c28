//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;
mod vars;

pub use request::{
    Attachment, DeliveryOptions, MergeLanguage, Message, Recipient, RecipientMetadata,
    RecipientType, RecipientVariables, SendMessage, SendTemplate, SubaccountSpec, TemplateSpec,
};
pub use response::{
    ApiError, RejectReason, SendResult, SendStatus, Subaccount, SubaccountStatus, Template,
};
pub use validation::ValidationError;
pub use value::{ApiKey, KnownErrorName, SendAt, SubaccountId, TemplateName};
pub use vars::{Variable, VariableSource, for_recipient, to_variable_list};

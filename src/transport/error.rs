use crate::domain::ApiError;

use super::TransportError;

/// Decode the `{status, code, name, message}` body Mandrill sends with 4xx/5xx responses.
///
/// A body that is not an API error (for example a gateway's HTML page) is reported
/// together with the HTTP status it arrived with.
pub fn decode_api_error(status: u16, json: &str) -> Result<ApiError, TransportError> {
    serde_json::from_str(json).map_err(|source| TransportError::ErrorBody {
        status,
        body: json.to_owned(),
        source,
    })
}

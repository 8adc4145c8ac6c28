//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};

use crate::domain::{
    ApiError, ApiKey, SendMessage, SendResult, SendTemplate, Subaccount, SubaccountId,
    SubaccountSpec, Template, TemplateName, TemplateSpec, ValidationError,
};
use crate::transport::{self, TransportError};

const DEFAULT_BASE_URL: &str = "https://mandrillapp.com/api/1.0/";
const BASE_URL_ENV_VAR: &str = "MANDRILL_BASE_URL";

const PING_PATH: &str = "users/ping.json";
const SEND_PATH: &str = "messages/send.json";
const SEND_TEMPLATE_PATH: &str = "messages/send-template.json";
const TEMPLATE_ADD_PATH: &str = "templates/add.json";
const TEMPLATE_UPDATE_PATH: &str = "templates/update.json";
const TEMPLATE_INFO_PATH: &str = "templates/info.json";
const TEMPLATE_DELETE_PATH: &str = "templates/delete.json";
const TEMPLATE_PUBLISH_PATH: &str = "templates/publish.json";
const TEMPLATE_LIST_PATH: &str = "templates/list.json";
const SUBACCOUNT_ADD_PATH: &str = "subaccounts/add.json";
const SUBACCOUNT_UPDATE_PATH: &str = "subaccounts/update.json";
const SUBACCOUNT_INFO_PATH: &str = "subaccounts/info.json";
const SUBACCOUNT_DELETE_PATH: &str = "subaccounts/delete.json";
const SUBACCOUNT_PAUSE_PATH: &str = "subaccounts/pause.json";
const SUBACCOUNT_RESUME_PATH: &str = "subaccounts/resume.json";
const SUBACCOUNT_LIST_PATH: &str = "subaccounts/list.json";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: serde_json::Value,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: serde_json::Value,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.post(url).json(&body).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// How the send endpoints behave.
///
/// The sandbox modes only affect [`MandrillClient::send_message`] and
/// [`MandrillClient::send_template`]; every other call always reaches the network.
pub enum SandboxMode {
    /// Requests are sent to Mandrill.
    #[default]
    Live,
    /// Sends succeed with an empty result list without a network call.
    AlwaysSucceed,
    /// Sends fail with [`MandrillError::Sandbox`] without a network call.
    AlwaysFail,
}

impl SandboxMode {
    /// API key that selects [`SandboxMode::AlwaysSucceed`].
    pub const SUCCESS_KEY: &'static str = "SANDBOX_SUCCESS";
    /// API key that selects [`SandboxMode::AlwaysFail`].
    pub const ERROR_KEY: &'static str = "SANDBOX_ERROR";

    /// Mode selected by the reserved sandbox keys; any other key is [`SandboxMode::Live`].
    pub fn from_key(key: &ApiKey) -> Self {
        match key.as_str() {
            Self::SUCCESS_KEY => Self::AlwaysSucceed,
            Self::ERROR_KEY => Self::AlwaysFail,
            _ => Self::Live,
        }
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`MandrillClient`].
///
/// Transport failures, Mandrill-reported errors and undecodable bodies are separate
/// variants so callers can branch on them.
pub enum MandrillError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Mandrill answered with HTTP 400 or above and a structured error body.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Response body could not be decoded into the shape the endpoint returns.
    #[error("decode error: {0}")]
    Decode(#[source] Box<dyn StdError + Send + Sync>),

    /// Status code outside both the success and the API error range.
    #[error("unexpected HTTP status: {status}")]
    UnexpectedStatus { status: u16, body: Option<String> },

    /// Request payload could not be encoded as JSON.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// The client runs in [`SandboxMode::AlwaysFail`].
    #[error("SANDBOX_ERROR")]
    Sandbox,

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl From<TransportError> for MandrillError {
    fn from(value: TransportError) -> Self {
        Self::Decode(Box::new(value))
    }
}

#[derive(Debug, Clone)]
/// Builder for [`MandrillClient`].
///
/// Use this when you need to customize the base URL, timeout, user-agent or sandbox mode.
pub struct MandrillClientBuilder {
    key: ApiKey,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    sandbox: Option<SandboxMode>,
}

impl MandrillClientBuilder {
    /// Create a builder with the default base URL and no timeout/user-agent override.
    pub fn new(key: ApiKey) -> Self {
        Self {
            key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
            sandbox: None,
        }
    }

    /// Create a builder from `MANDRILL_API_KEY` and, when set, `MANDRILL_BASE_URL`.
    pub fn from_env() -> Result<Self, ValidationError> {
        let mut builder = Self::new(ApiKey::from_env()?);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV_VAR) {
            builder = builder.base_url(base_url);
        }
        Ok(builder)
    }

    /// Override the API base URL. Endpoint paths are appended to it.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Force a sandbox mode instead of deriving it from the API key.
    pub fn sandbox_mode(mut self, mode: SandboxMode) -> Self {
        self.sandbox = Some(mode);
        self
    }

    /// Build a [`MandrillClient`].
    pub fn build(self) -> Result<MandrillClient, MandrillError> {
        let base_url = normalize_base_url(&self.base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| MandrillError::Transport(Box::new(err)))?;

        let sandbox = self
            .sandbox
            .unwrap_or_else(|| SandboxMode::from_key(&self.key));

        Ok(MandrillClient {
            key: self.key,
            base_url,
            sandbox,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

fn normalize_base_url(input: &str) -> Result<String, ValidationError> {
    let invalid = || ValidationError::InvalidBaseUrl {
        input: input.to_owned(),
    };
    let parsed = url::Url::parse(input.trim()).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
        return Err(invalid());
    }
    // Endpoint paths are appended verbatim, so they must land in the path.
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid());
    }

    let mut normalized = parsed.to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Ok(normalized)
}

#[derive(Clone)]
/// High-level Mandrill client.
///
/// Every method issues at most one `POST` of a JSON envelope to
/// `base_url + <endpoint path>` and decodes the body. Clones share the underlying
/// connection pool, so a single client can serve concurrent tasks.
pub struct MandrillClient {
    key: ApiKey,
    base_url: String,
    sandbox: SandboxMode,
    http: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for MandrillClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MandrillClient")
            .field("key", &self.key)
            .field("base_url", &self.base_url)
            .field("sandbox", &self.sandbox)
            .finish_non_exhaustive()
    }
}

impl MandrillClient {
    /// Create a client using the default base URL.
    ///
    /// The sandbox mode is derived from the key (see [`SandboxMode::from_key`]).
    /// For more customization, use [`MandrillClient::builder`].
    pub fn new(key: ApiKey) -> Self {
        Self {
            sandbox: SandboxMode::from_key(&key),
            key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(key: ApiKey) -> MandrillClientBuilder {
        MandrillClientBuilder::new(key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn sandbox_mode(&self) -> SandboxMode {
        self.sandbox
    }

    /// Validate the API key (`users/ping`). Returns `"PONG!"` on success.
    pub async fn ping(&self) -> Result<String, MandrillError> {
        let payload = transport::encode_ping(&self.key).map_err(MandrillError::Encode)?;
        let body = self.dispatch(PING_PATH, payload).await?;
        Ok(transport::decode_ping_json_response(&body)?)
    }

    /// Send a message (`messages/send`).
    ///
    /// Returns one [`SendResult`] per recipient. In a sandbox mode no request is made.
    ///
    /// Errors:
    /// - [`MandrillError::Api`] when Mandrill rejects the call,
    /// - [`MandrillError::Decode`] when the body is not a result array,
    /// - [`MandrillError::Sandbox`] in [`SandboxMode::AlwaysFail`].
    pub async fn send_message(
        &self,
        request: &SendMessage,
    ) -> Result<Vec<SendResult>, MandrillError> {
        if let Some(outcome) = self.sandbox_outcome(SEND_PATH) {
            return outcome;
        }

        let payload =
            transport::encode_send_message(&self.key, request).map_err(MandrillError::Encode)?;
        let body = self.dispatch(SEND_PATH, payload).await?;
        Ok(transport::decode_send_json_response(&body)?)
    }

    /// Send a message using a stored template (`messages/send-template`).
    ///
    /// Same result and sandbox behavior as [`MandrillClient::send_message`].
    pub async fn send_template(
        &self,
        request: &SendTemplate,
    ) -> Result<Vec<SendResult>, MandrillError> {
        if let Some(outcome) = self.sandbox_outcome(SEND_TEMPLATE_PATH) {
            return outcome;
        }

        let payload =
            transport::encode_send_template(&self.key, request).map_err(MandrillError::Encode)?;
        let body = self.dispatch(SEND_TEMPLATE_PATH, payload).await?;
        Ok(transport::decode_send_json_response(&body)?)
    }

    pub async fn add_template(&self, spec: &TemplateSpec) -> Result<Template, MandrillError> {
        let payload =
            transport::encode_template_spec(&self.key, spec).map_err(MandrillError::Encode)?;
        let body = self.dispatch(TEMPLATE_ADD_PATH, payload).await?;
        Ok(transport::decode_template_json_response(&body)?)
    }

    pub async fn update_template(&self, spec: &TemplateSpec) -> Result<Template, MandrillError> {
        let payload =
            transport::encode_template_spec(&self.key, spec).map_err(MandrillError::Encode)?;
        let body = self.dispatch(TEMPLATE_UPDATE_PATH, payload).await?;
        Ok(transport::decode_template_json_response(&body)?)
    }

    pub async fn template_info(&self, name: &TemplateName) -> Result<Template, MandrillError> {
        self.template_by_name(TEMPLATE_INFO_PATH, name).await
    }

    /// Delete a template. Mandrill returns the deleted template.
    pub async fn delete_template(&self, name: &TemplateName) -> Result<Template, MandrillError> {
        self.template_by_name(TEMPLATE_DELETE_PATH, name).await
    }

    /// Publish the current draft of a template.
    pub async fn publish_template(&self, name: &TemplateName) -> Result<Template, MandrillError> {
        self.template_by_name(TEMPLATE_PUBLISH_PATH, name).await
    }

    /// List templates, optionally only those carrying `label`.
    pub async fn list_templates(
        &self,
        label: Option<&str>,
    ) -> Result<Vec<Template>, MandrillError> {
        let payload =
            transport::encode_list_templates(&self.key, label).map_err(MandrillError::Encode)?;
        let body = self.dispatch(TEMPLATE_LIST_PATH, payload).await?;
        Ok(transport::decode_templates_json_response(&body)?)
    }

    pub async fn add_subaccount(
        &self,
        spec: &SubaccountSpec,
    ) -> Result<Subaccount, MandrillError> {
        let payload =
            transport::encode_subaccount_spec(&self.key, spec).map_err(MandrillError::Encode)?;
        let body = self.dispatch(SUBACCOUNT_ADD_PATH, payload).await?;
        Ok(transport::decode_subaccount_json_response(&body)?)
    }

    pub async fn update_subaccount(
        &self,
        spec: &SubaccountSpec,
    ) -> Result<Subaccount, MandrillError> {
        let payload =
            transport::encode_subaccount_spec(&self.key, spec).map_err(MandrillError::Encode)?;
        let body = self.dispatch(SUBACCOUNT_UPDATE_PATH, payload).await?;
        Ok(transport::decode_subaccount_json_response(&body)?)
    }

    pub async fn subaccount_info(&self, id: &SubaccountId) -> Result<Subaccount, MandrillError> {
        self.subaccount_by_id(SUBACCOUNT_INFO_PATH, id).await
    }

    /// Delete a subaccount. Mandrill returns the deleted subaccount.
    pub async fn delete_subaccount(&self, id: &SubaccountId) -> Result<Subaccount, MandrillError> {
        self.subaccount_by_id(SUBACCOUNT_DELETE_PATH, id).await
    }

    /// Pause a subaccount; its messages are queued until it is resumed.
    pub async fn pause_subaccount(&self, id: &SubaccountId) -> Result<Subaccount, MandrillError> {
        self.subaccount_by_id(SUBACCOUNT_PAUSE_PATH, id).await
    }

    pub async fn resume_subaccount(&self, id: &SubaccountId) -> Result<Subaccount, MandrillError> {
        self.subaccount_by_id(SUBACCOUNT_RESUME_PATH, id).await
    }

    /// List subaccounts, optionally filtered by an id/name prefix.
    pub async fn list_subaccounts(
        &self,
        query: Option<&str>,
    ) -> Result<Vec<Subaccount>, MandrillError> {
        let payload =
            transport::encode_list_subaccounts(&self.key, query).map_err(MandrillError::Encode)?;
        let body = self.dispatch(SUBACCOUNT_LIST_PATH, payload).await?;
        Ok(transport::decode_subaccounts_json_response(&body)?)
    }

    async fn template_by_name(
        &self,
        path: &'static str,
        name: &TemplateName,
    ) -> Result<Template, MandrillError> {
        let payload =
            transport::encode_template_name(&self.key, name).map_err(MandrillError::Encode)?;
        let body = self.dispatch(path, payload).await?;
        Ok(transport::decode_template_json_response(&body)?)
    }

    async fn subaccount_by_id(
        &self,
        path: &'static str,
        id: &SubaccountId,
    ) -> Result<Subaccount, MandrillError> {
        let payload =
            transport::encode_subaccount_id(&self.key, id).map_err(MandrillError::Encode)?;
        let body = self.dispatch(path, payload).await?;
        Ok(transport::decode_subaccount_json_response(&body)?)
    }

    fn sandbox_outcome(
        &self,
        path: &'static str,
    ) -> Option<Result<Vec<SendResult>, MandrillError>> {
        match self.sandbox {
            SandboxMode::Live => None,
            SandboxMode::AlwaysSucceed => {
                debug!(path, "sandbox mode: skipping request, reporting success");
                Some(Ok(Vec::new()))
            }
            SandboxMode::AlwaysFail => {
                debug!(path, "sandbox mode: skipping request, reporting failure");
                Some(Err(MandrillError::Sandbox))
            }
        }
    }

    /// POST `payload` to `path` and return the body of a successful response.
    async fn dispatch(
        &self,
        path: &'static str,
        payload: serde_json::Value,
    ) -> Result<String, MandrillError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(path, "sending Mandrill request");

        let response = self
            .http
            .post_json(&url, payload)
            .await
            .map_err(MandrillError::Transport)?;

        debug!(path, status = response.status, "received Mandrill response");
        trace!(path, bytes = response.body.len(), "Mandrill response body");

        classify_response(response)
    }
}

fn classify_response(response: HttpResponse) -> Result<String, MandrillError> {
    match response.status {
        200..=399 => Ok(response.body),
        status if status >= 400 => {
            let error = transport::decode_api_error(status, &response.body)?;
            debug!(
                status,
                code = error.code,
                name = %error.name,
                "Mandrill returned an API error"
            );
            Err(MandrillError::Api(error))
        }
        status => {
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            Err(MandrillError::UnexpectedStatus { status, body })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use crate::domain::{
        DeliveryOptions, KnownErrorName, Message, RecipientType, RejectReason, SendAt, SendStatus,
        SubaccountStatus,
    };

    use super::*;

    #[derive(Debug, Clone)]
    struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        last_url: Option<String>,
        last_body: Option<serde_json::Value>,
        calls: usize,
        response_status: u16,
        response_body: String,
    }

    impl FakeTransport {
        fn new(response_status: u16, response_body: impl Into<String>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    last_url: None,
                    last_body: None,
                    calls: 0,
                    response_status,
                    response_body: response_body.into(),
                })),
            }
        }

        fn last_request(&self) -> (Option<String>, Option<serde_json::Value>) {
            let state = self.state.lock().unwrap();
            (state.last_url.clone(), state.last_body.clone())
        }

        fn calls(&self) -> usize {
            self.state.lock().unwrap().calls
        }
    }

    impl HttpTransport for FakeTransport {
        fn post_json<'a>(
            &'a self,
            url: &'a str,
            body: serde_json::Value,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let (status, body) = {
                    let mut state = self.state.lock().unwrap();
                    state.last_url = Some(url.to_owned());
                    state.last_body = Some(body);
                    state.calls += 1;
                    (state.response_status, state.response_body.clone())
                };
                Ok(HttpResponse { status, body })
            })
        }
    }

    /// Fails the test if any request reaches the network layer.
    struct UnreachableTransport;

    impl HttpTransport for UnreachableTransport {
        fn post_json<'a>(
            &'a self,
            url: &'a str,
            _body: serde_json::Value,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            panic!("transport must not be called, got request to {url}");
        }
    }

    struct BrokenTransport;

    impl HttpTransport for BrokenTransport {
        fn post_json<'a>(
            &'a self,
            _url: &'a str,
            _body: serde_json::Value,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                Err::<HttpResponse, Box<dyn StdError + Send + Sync>>(
                    std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused").into(),
                )
            })
        }
    }

    const UNKNOWN_SUBACCOUNT_JSON: &str = r#"{"status":"error","code":12,"name":"Unknown_Subaccount","message":"No subaccount exists with the id 'customer-123'"}"#;
    const SEND_OK_JSON: &str = r#"[{"email":"bob@example.com","status":"sent","reject_reason":"hard-bounce","_id":"1"}]"#;

    fn make_client(key: &str, transport: impl HttpTransport + 'static) -> MandrillClient {
        let key = ApiKey::new(key).unwrap();
        MandrillClient {
            sandbox: SandboxMode::from_key(&key),
            key,
            base_url: "https://example.invalid/api/1.0/".to_owned(),
            http: Arc::new(transport),
        }
    }

    fn unknown_subaccount_error() -> ApiError {
        ApiError {
            status: "error".to_owned(),
            code: 12,
            name: "Unknown_Subaccount".to_owned(),
            message: "No subaccount exists with the id 'customer-123'".to_owned(),
        }
    }

    fn template_request() -> SendTemplate {
        SendTemplate::new(
            TemplateName::new("cheese").unwrap(),
            [("name", "bob")],
            Message::default(),
        )
    }

    #[tokio::test]
    async fn send_message_posts_envelope_and_parses_results() {
        let transport = FakeTransport::new(200, SEND_OK_JSON);
        let client = make_client("APIKEY", transport.clone());

        let mut message = Message::default();
        message.add_recipient("bob@example.com", "Bob Johnson", RecipientType::To);
        let request = SendMessage::new(message);

        let results = client.send_message(&request).await.unwrap();
        assert_eq!(
            results,
            vec![SendResult {
                email: "bob@example.com".to_owned(),
                status: SendStatus::Sent,
                reject_reason: Some(RejectReason::HardBounce),
                id: "1".to_owned(),
            }]
        );

        let (url, body) = transport.last_request();
        assert_eq!(
            url.as_deref(),
            Some("https://example.invalid/api/1.0/messages/send.json")
        );
        let body = body.unwrap();
        assert_eq!(body["key"], "APIKEY");
        assert_eq!(body["message"]["to"][0]["email"], "bob@example.com");
    }

    #[tokio::test]
    async fn send_message_places_delivery_options_at_envelope_root() {
        let transport = FakeTransport::new(200, "[]");
        let client = make_client("APIKEY", transport.clone());

        let request = SendMessage::new(Message::default()).with_delivery(DeliveryOptions {
            asynchronous: true,
            ip_pool: Some("pool1".to_owned()),
            send_at: Some(SendAt::new("2020-01-01 00:00:00").unwrap()),
        });
        client.send_message(&request).await.unwrap();

        let body = transport.last_request().1.unwrap();
        assert_eq!(body["async"], json!(true));
        assert_eq!(body["ip_pool"], json!("pool1"));
        assert_eq!(body["send_at"], json!("2020-01-01 00:00:00"));
        assert!(body["message"].get("async").is_none());
        assert!(body["message"].get("ip_pool").is_none());
        assert!(body["message"].get("send_at").is_none());
    }

    #[tokio::test]
    async fn send_message_maps_error_body_to_api_error() {
        let transport = FakeTransport::new(400, UNKNOWN_SUBACCOUNT_JSON);
        let client = make_client("APIKEY", transport);

        let err = client
            .send_message(&SendMessage::default())
            .await
            .unwrap_err();
        match err {
            MandrillError::Api(api) => {
                assert_eq!(api, unknown_subaccount_error());
                assert_eq!(api.known_kind(), Some(KnownErrorName::UnknownSubaccount));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn api_error_display_is_the_message() {
        let transport = FakeTransport::new(500, UNKNOWN_SUBACCOUNT_JSON);
        let client = make_client("APIKEY", transport);

        let err = client
            .send_message(&SendMessage::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "No subaccount exists with the id 'customer-123'"
        );
    }

    #[tokio::test]
    async fn undecodable_error_body_is_a_decode_error() {
        let transport = FakeTransport::new(400, "");
        let client = make_client("APIKEY", transport);

        let err = client.send_template(&template_request()).await.unwrap_err();
        assert!(matches!(err, MandrillError::Decode(_)));
    }

    #[tokio::test]
    async fn non_json_error_body_keeps_status_and_body() {
        let transport = FakeTransport::new(502, "<html>Bad Gateway</html>");
        let client = make_client("APIKEY", transport);

        let err = client.ping().await.unwrap_err();
        let source = match err {
            MandrillError::Decode(source) => source,
            other => panic!("unexpected error: {other:?}"),
        };
        match source.downcast_ref::<TransportError>() {
            Some(TransportError::ErrorBody { status, body, .. }) => {
                assert_eq!(*status, 502);
                assert_eq!(body, "<html>Bad Gateway</html>");
            }
            other => panic!("unexpected source: {other:?}"),
        }
        assert!(source.to_string().contains("502"));
    }

    #[tokio::test]
    async fn success_body_of_wrong_shape_is_a_decode_error() {
        let transport = FakeTransport::new(200, r#"{"email":"bob@example.com"}"#);
        let client = make_client("APIKEY", transport);

        let err = client
            .send_message(&SendMessage::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MandrillError::Decode(_)));
    }

    #[tokio::test]
    async fn redirect_range_status_is_treated_as_success() {
        let transport = FakeTransport::new(302, "[]");
        let client = make_client("APIKEY", transport);

        let results = client.send_message(&SendMessage::default()).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn informational_status_is_unexpected() {
        let transport = FakeTransport::new(101, "  ");
        let client = make_client("APIKEY", transport);

        let err = client.ping().await.unwrap_err();
        assert!(matches!(
            err,
            MandrillError::UnexpectedStatus {
                status: 101,
                body: None
            }
        ));
    }

    #[tokio::test]
    async fn transport_failure_is_reported_as_transport_error() {
        let client = make_client("APIKEY", BrokenTransport);

        let err = client.ping().await.unwrap_err();
        assert!(matches!(err, MandrillError::Transport(_)));
    }

    #[tokio::test]
    async fn send_template_posts_template_envelope() {
        let transport = FakeTransport::new(200, SEND_OK_JSON);
        let client = make_client("APIKEY", transport.clone());

        let results = client.send_template(&template_request()).await.unwrap();
        assert_eq!(results.len(), 1);

        let (url, body) = transport.last_request();
        assert_eq!(
            url.as_deref(),
            Some("https://example.invalid/api/1.0/messages/send-template.json")
        );
        let body = body.unwrap();
        assert_eq!(body["template_name"], "cheese");
        assert_eq!(
            body["template_content"],
            json!([{"name": "name", "content": "bob"}])
        );
    }

    #[tokio::test]
    async fn send_template_maps_error_body_to_api_error() {
        let transport = FakeTransport::new(400, UNKNOWN_SUBACCOUNT_JSON);
        let client = make_client("APIKEY", transport);

        let err = client.send_template(&template_request()).await.unwrap_err();
        assert!(matches!(err, MandrillError::Api(api) if api == unknown_subaccount_error()));
    }

    #[tokio::test]
    async fn sandbox_success_key_skips_network() {
        let client = make_client(SandboxMode::SUCCESS_KEY, UnreachableTransport);
        assert_eq!(client.sandbox_mode(), SandboxMode::AlwaysSucceed);

        assert!(
            client
                .send_message(&SendMessage::default())
                .await
                .unwrap()
                .is_empty()
        );
        assert!(
            client
                .send_template(&template_request())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn sandbox_error_key_fails_without_network() {
        let client = make_client(SandboxMode::ERROR_KEY, UnreachableTransport);

        let err = client
            .send_message(&SendMessage::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MandrillError::Sandbox));
        let err = client.send_template(&template_request()).await.unwrap_err();
        assert!(matches!(err, MandrillError::Sandbox));
    }

    #[tokio::test]
    async fn sandbox_keys_do_not_affect_other_endpoints() {
        let transport = FakeTransport::new(200, "\"PONG!\"");
        let client = make_client(SandboxMode::SUCCESS_KEY, transport.clone());
        assert_eq!(client.ping().await.unwrap(), "PONG!");

        let transport_err = FakeTransport::new(
            200,
            r#"{"id":"cust-123","status":"active","reputation":10}"#,
        );
        let client = make_client(SandboxMode::ERROR_KEY, transport_err.clone());
        let id = SubaccountId::new("cust-123").unwrap();
        client.subaccount_info(&id).await.unwrap();

        assert_eq!(transport.calls(), 1);
        assert_eq!(transport_err.calls(), 1);
    }

    #[tokio::test]
    async fn ping_returns_pong() {
        let transport = FakeTransport::new(200, "\"PONG!\"\n");
        let client = make_client("APIKEY", transport.clone());

        assert_eq!(client.ping().await.unwrap(), "PONG!");

        let (url, body) = transport.last_request();
        assert_eq!(
            url.as_deref(),
            Some("https://example.invalid/api/1.0/users/ping.json")
        );
        assert_eq!(body, Some(json!({"key": "APIKEY"})));
    }

    #[tokio::test]
    async fn ping_maps_invalid_key_error() {
        let transport = FakeTransport::new(
            400,
            r#"{"status":"error","code":-1,"name":"Invalid_Key","message":"Invalid API key"}"#,
        );
        let client = make_client("APIKEY", transport);

        match client.ping().await.unwrap_err() {
            MandrillError::Api(api) => {
                assert_eq!(api.code, -1);
                assert_eq!(api.name, "Invalid_Key");
                assert_eq!(api.message, "Invalid API key");
                assert_eq!(api.known_kind(), Some(KnownErrorName::InvalidKey));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn template_operations_use_their_paths() {
        let template = r#"{"slug":"welcome","name":"Welcome","labels":[]}"#;
        let transport = FakeTransport::new(200, template);
        let client = make_client("APIKEY", transport.clone());
        let name = TemplateName::new("welcome").unwrap();

        let mut spec = TemplateSpec::new(name.clone());
        spec.subject = Some("Hi".to_owned());

        client.add_template(&spec).await.unwrap();
        assert_eq!(
            transport.last_request().0.as_deref(),
            Some("https://example.invalid/api/1.0/templates/add.json")
        );
        assert_eq!(
            transport.last_request().1,
            Some(json!({"key": "APIKEY", "name": "welcome", "subject": "Hi"}))
        );

        client.update_template(&spec).await.unwrap();
        assert!(
            transport
                .last_request()
                .0
                .unwrap()
                .ends_with("templates/update.json")
        );

        let info = client.template_info(&name).await.unwrap();
        assert_eq!(info.slug, "welcome");
        assert!(
            transport
                .last_request()
                .0
                .unwrap()
                .ends_with("templates/info.json")
        );
        assert_eq!(
            transport.last_request().1,
            Some(json!({"key": "APIKEY", "name": "welcome"}))
        );

        client.delete_template(&name).await.unwrap();
        assert!(
            transport
                .last_request()
                .0
                .unwrap()
                .ends_with("templates/delete.json")
        );

        client.publish_template(&name).await.unwrap();
        assert!(
            transport
                .last_request()
                .0
                .unwrap()
                .ends_with("templates/publish.json")
        );
        assert_eq!(transport.calls(), 5);
    }

    #[tokio::test]
    async fn template_info_rejects_list_body() {
        let transport = FakeTransport::new(200, r#"[{"slug":"welcome","name":"Welcome"}]"#);
        let client = make_client("APIKEY", transport);

        let err = client
            .template_info(&TemplateName::new("welcome").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, MandrillError::Decode(_)));
    }

    #[tokio::test]
    async fn list_templates_decodes_array() {
        let transport = FakeTransport::new(200, r#"[{"slug":"welcome","name":"Welcome"}]"#);
        let client = make_client("APIKEY", transport.clone());

        let templates = client.list_templates(Some("onboarding")).await.unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(
            transport.last_request().1,
            Some(json!({"key": "APIKEY", "label": "onboarding"}))
        );
    }

    #[tokio::test]
    async fn subaccount_operations_use_their_paths() {
        let subaccount =
            r#"{"id":"cust-123","name":"ABC","status":"paused","reputation":42,"sent_total":7}"#;
        let transport = FakeTransport::new(200, subaccount);
        let client = make_client("APIKEY", transport.clone());
        let id = SubaccountId::new("cust-123").unwrap();

        let mut spec = SubaccountSpec::new(id.clone());
        spec.name = Some("ABC".to_owned());

        let added = client.add_subaccount(&spec).await.unwrap();
        assert_eq!(added.status, SubaccountStatus::Paused);
        assert_eq!(added.sent_total, 7);
        assert!(
            transport
                .last_request()
                .0
                .unwrap()
                .ends_with("subaccounts/add.json")
        );

        client.update_subaccount(&spec).await.unwrap();
        assert!(
            transport
                .last_request()
                .0
                .unwrap()
                .ends_with("subaccounts/update.json")
        );

        for (path, call) in [
            ("subaccounts/info.json", 0),
            ("subaccounts/delete.json", 1),
            ("subaccounts/pause.json", 2),
            ("subaccounts/resume.json", 3),
        ] {
            match call {
                0 => client.subaccount_info(&id).await.unwrap(),
                1 => client.delete_subaccount(&id).await.unwrap(),
                2 => client.pause_subaccount(&id).await.unwrap(),
                _ => client.resume_subaccount(&id).await.unwrap(),
            };
            let (url, body) = transport.last_request();
            assert!(url.unwrap().ends_with(path));
            assert_eq!(body, Some(json!({"key": "APIKEY", "id": "cust-123"})));
        }
    }

    #[tokio::test]
    async fn list_subaccounts_decodes_array_and_rejects_singleton() {
        let transport = FakeTransport::new(200, r#"[{"id":"a","status":"active"}]"#);
        let client = make_client("APIKEY", transport);
        let all = client.list_subaccounts(None).await.unwrap();
        assert_eq!(all.len(), 1);

        let transport = FakeTransport::new(200, r#"{"id":"a","status":"active"}"#);
        let client = make_client("APIKEY", transport);
        let err = client.list_subaccounts(Some("a")).await.unwrap_err();
        assert!(matches!(err, MandrillError::Decode(_)));
    }

    #[tokio::test]
    async fn subaccount_error_is_surfaced() {
        let transport = FakeTransport::new(500, UNKNOWN_SUBACCOUNT_JSON);
        let client = make_client("APIKEY", transport);

        let err = client
            .delete_subaccount(&SubaccountId::new("customer-123").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, MandrillError::Api(api) if api.code == 12));
    }

    #[test]
    fn sandbox_mode_is_derived_from_reserved_keys() {
        let mode = |key: &str| SandboxMode::from_key(&ApiKey::new(key).unwrap());
        assert_eq!(mode("SANDBOX_SUCCESS"), SandboxMode::AlwaysSucceed);
        assert_eq!(mode("SANDBOX_ERROR"), SandboxMode::AlwaysFail);
        assert_eq!(mode("real-key"), SandboxMode::Live);
        assert_eq!(mode(" SANDBOX_SUCCESS\n"), SandboxMode::Live);
        assert_eq!(mode("sandbox_error"), SandboxMode::Live);
    }

    #[test]
    fn builder_normalizes_base_url_and_honors_sandbox_override() {
        let client = MandrillClient::builder(ApiKey::new("key").unwrap())
            .base_url("http://127.0.0.1:8080/api/1.0")
            .sandbox_mode(SandboxMode::AlwaysFail)
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080/api/1.0/");
        assert_eq!(client.sandbox_mode(), SandboxMode::AlwaysFail);

        let client = MandrillClient::new(ApiKey::new("SANDBOX_SUCCESS").unwrap());
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.sandbox_mode(), SandboxMode::AlwaysSucceed);
    }

    #[test]
    fn builder_rejects_non_http_or_query_bearing_base_url() {
        for input in [
            "ftp://example.com/",
            "not a url",
            "mailto:bob@example.com",
            "https://proxy.example/api/1.0/?token=abc",
            "https://proxy.example/api/1.0/#section",
        ] {
            let err = MandrillClient::builder(ApiKey::new("key").unwrap())
                .base_url(input)
                .build()
                .unwrap_err();
            assert!(matches!(
                err,
                MandrillError::Validation(ValidationError::InvalidBaseUrl { .. })
            ));
        }
    }

    #[test]
    fn client_debug_does_not_leak_key() {
        let client = MandrillClient::new(ApiKey::new("super-secret").unwrap());
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret"));
    }
}

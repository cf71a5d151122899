//! Client layer: orchestrates SOAP round trips and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::{Credentials, FlatResponse, Recipient, ValidationError};
use crate::transport::{
    build_envelope, decode_flat_xml, encode_xms_data, encode_xms_user, extract_fault,
    extract_result, soap_action, split_message,
};

const DEFAULT_ENDPOINT: &str = "https://sms.megafon.ru/oms/service.asmx";
const DEFAULT_SCHEMA: &str = "http://sms.megafon.ru/oms";

/// Service-configuration path holding the per-message character limit.
const CHUNK_LIMIT_PATH: &str = "serviceInfo.supportedService.SMS_SENDER.maxDbcsPerMessage";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct SoapResponse {
    status: u16,
    body: String,
}

trait SoapTransport: Send + Sync {
    fn call<'a>(
        &'a self,
        action: &'a str,
        envelope: String,
    ) -> BoxFuture<'a, Result<SoapResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestSoapTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl SoapTransport for ReqwestSoapTransport {
    fn call<'a>(
        &'a self,
        action: &'a str,
        envelope: String,
    ) -> BoxFuture<'a, Result<SoapResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.endpoint.as_str())
                .header("Content-Type", "text/xml; charset=utf-8")
                .header("SOAPAction", format!("\"{action}\""))
                .body(envelope)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(SoapResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`OmsGateClient`].
pub enum OmsGateError {
    /// Transport construction or network failure, underlying cause forwarded.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Operation invoked before a successful [`OmsGateClient::init`].
    #[error("client not initialized; call init() first")]
    Uninitialized,

    /// The endpoint setting is not a valid URL.
    #[error("invalid endpoint url: {input}")]
    InvalidEndpoint { input: String },

    /// Recipient did not reduce to 11–14 decimal digits.
    #[error("invalid recipient number: {input}")]
    InvalidRecipient { input: String },

    /// Service configuration is absent or carries no usable chunk limit.
    #[error("service configuration has no usable chunk limit at {path}")]
    MissingChunkLimit { path: &'static str },

    /// Non-successful HTTP status without a SOAP fault in the body.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The remote operation returned a SOAP fault.
    #[error("remote operation fault: {reason}")]
    RemoteFault {
        code: Option<String>,
        reason: String,
    },

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
/// Builder for [`OmsGateClient`].
///
/// Use this when you need to customize the endpoint, schema namespace,
/// timeout, or user-agent.
pub struct OmsGateClientBuilder {
    credentials: Credentials,
    endpoint: String,
    schema: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl OmsGateClientBuilder {
    /// Create a builder with the provider's default endpoint and schema.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            schema: DEFAULT_SCHEMA.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the gateway endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the service schema namespace used for `SOAPAction` values
    /// and operation elements.
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
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

    /// Build an uninitialized [`OmsGateClient`]; no I/O is performed.
    pub fn build(self) -> OmsGateClient {
        OmsGateClient {
            credentials: self.credentials,
            endpoint: self.endpoint,
            schema: self.schema,
            timeout: self.timeout,
            user_agent: self.user_agent,
            transport: None,
            service_config: None,
        }
    }

    /// Build the client and run [`OmsGateClient::init`], returning a ready
    /// session.
    pub async fn connect(self) -> Result<OmsGateClient, OmsGateError> {
        let mut client = self.build();
        client.init().await?;
        Ok(client)
    }
}

/// Session against the OMS gateway.
///
/// The session starts uninitialized; [`OmsGateClient::init`] establishes the
/// transport and populates the cached service configuration in one step. Any
/// init failure returns the session to the uninitialized state, and every
/// operation on an uninitialized session fails with
/// [`OmsGateError::Uninitialized`] without touching the network.
pub struct OmsGateClient {
    credentials: Credentials,
    endpoint: String,
    schema: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    transport: Option<Arc<dyn SoapTransport>>,
    service_config: Option<FlatResponse>,
}

impl OmsGateClient {
    /// Create an uninitialized client with the default endpoint and schema.
    ///
    /// For more customization, use [`OmsGateClient::builder`].
    pub fn new(credentials: Credentials) -> Self {
        Self::builder(credentials).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> OmsGateClientBuilder {
        OmsGateClientBuilder::new(credentials)
    }

    /// Whether a successful [`OmsGateClient::init`] has completed.
    pub fn is_initialized(&self) -> bool {
        self.transport.is_some()
    }

    /// The cached service configuration, populated by the latest successful
    /// service-info fetch.
    pub fn service_config(&self) -> Option<&FlatResponse> {
        self.service_config.as_ref()
    }

    /// Establish the transport and fetch the service configuration.
    ///
    /// On any failure the session stays uninitialized: a bad endpoint or
    /// client construction error surfaces before any network traffic, and a
    /// failed service-info fetch clears the stored transport again.
    pub async fn init(&mut self) -> Result<(), OmsGateError> {
        url::Url::parse(&self.endpoint).map_err(|_| OmsGateError::InvalidEndpoint {
            input: self.endpoint.clone(),
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent.as_ref() {
            builder = builder.user_agent(user_agent.clone());
        }
        let client = builder
            .build()
            .map_err(|err| OmsGateError::Transport(Box::new(err)))?;

        self.init_with(Arc::new(ReqwestSoapTransport {
            client,
            endpoint: self.endpoint.clone(),
        }))
        .await
    }

    async fn init_with(&mut self, transport: Arc<dyn SoapTransport>) -> Result<(), OmsGateError> {
        self.transport = Some(transport);
        if let Err(err) = self.get_service_info().await {
            self.transport = None;
            self.service_config = None;
            return Err(err);
        }
        debug!(endpoint = %self.endpoint, "gateway session initialized");
        Ok(())
    }

    /// Fetch the provider's service configuration and cache it for later
    /// deliveries.
    pub async fn get_service_info(&mut self) -> Result<FlatResponse, OmsGateError> {
        let body = self.call("GetServiceInfo", &[]).await?;
        let config = decode_result(&body, &["GetServiceInfoResult"]);
        self.service_config = Some(config.clone());
        Ok(config)
    }

    /// Fetch account metadata for the configured credentials.
    ///
    /// The gateway answers under either of two result-field names; both are
    /// accepted. The cached service configuration is not touched.
    pub async fn get_user_info(&self) -> Result<FlatResponse, OmsGateError> {
        let document = encode_xms_user(self.credentials.user(), self.credentials.password());
        let body = self
            .call("GetUserInfo", &[("xmsUser", document)])
            .await?;
        Ok(decode_result(
            &body,
            &["GetUserInfoResult", "UserInfoResult"],
        ))
    }

    /// Deliver `message` to `recipient`, chunking it to the limit advertised
    /// by the cached service configuration.
    ///
    /// The recipient may use any common phone formatting; it must reduce to
    /// 11–14 digits. Requires an initialized session whose service
    /// configuration carries a usable chunk limit.
    pub async fn deliver_xms(
        &self,
        recipient: &str,
        message: &str,
    ) -> Result<FlatResponse, OmsGateError> {
        if self.transport.is_none() {
            return Err(OmsGateError::Uninitialized);
        }

        let recipient =
            Recipient::normalize(recipient).map_err(|_| OmsGateError::InvalidRecipient {
                input: recipient.to_owned(),
            })?;
        let limit = self.chunk_limit()?;

        let chunks = split_message(message, limit);
        debug!(
            recipient = recipient.as_str(),
            chunks = chunks.len(),
            limit,
            "delivering message"
        );

        let document = encode_xms_data(
            self.credentials.user(),
            self.credentials.password(),
            &recipient,
            Utc::now(),
            &chunks,
        );
        let body = self.call("DeliverXms", &[("xmsData", document)]).await?;
        Ok(decode_result(&body, &["DeliverXmsResult"]))
    }

    fn chunk_limit(&self) -> Result<usize, OmsGateError> {
        let config = self
            .service_config
            .as_ref()
            .ok_or(OmsGateError::MissingChunkLimit {
                path: CHUNK_LIMIT_PATH,
            })?;
        config
            .text(CHUNK_LIMIT_PATH)
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|limit| *limit > 0)
            .ok_or(OmsGateError::MissingChunkLimit {
                path: CHUNK_LIMIT_PATH,
            })
    }

    async fn call(
        &self,
        operation: &str,
        params: &[(&str, String)],
    ) -> Result<String, OmsGateError> {
        let transport = self.transport.as_ref().ok_or(OmsGateError::Uninitialized)?;
        let envelope = build_envelope(&self.schema, operation, params);
        let action = soap_action(&self.schema, operation);

        debug!(operation, "calling OMS gateway");
        let response = transport
            .call(&action, envelope)
            .await
            .map_err(OmsGateError::Transport)?;

        if let Some(fault) = extract_fault(&response.body) {
            warn!(
                operation,
                code = fault.code.as_deref(),
                "gateway returned a SOAP fault"
            );
            return Err(OmsGateError::RemoteFault {
                code: fault.code,
                reason: fault.reason.unwrap_or_default(),
            });
        }

        if !(200..=299).contains(&response.status) {
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(OmsGateError::HttpStatus {
                status: response.status,
                body,
            });
        }

        Ok(response.body)
    }
}

fn decode_result(body: &str, names: &[&str]) -> FlatResponse {
    let raw = extract_result(body, names).unwrap_or_default();
    decode_flat_xml(&raw)
}

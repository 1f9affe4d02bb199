use crate::api::models::{
    AuthStatus, Chat, ChatsResponse, ErrorBody, Health, LoginRequest, LoginResponse,
    ScheduledListResponse, ScheduledMessage, SchedulerStatus, SendRequest, SendResponse,
    SuccessResponse, VerifyRequest, VerifyResponse,
};
use crate::lists::Group;
use crate::media::Attachment;
use reqwest::multipart::{Form, Part};
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("not logged in")]
    NotAuthenticated,
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("network error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("unexpected response from server: {0}")]
    Decode(String),
    #[error("invalid server URL '{url}': {source}")]
    InvalidUrl { url: String, source: url::ParseError },
}

impl ApiError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout(_))
    }

    /// Text for the user; a timeout reads differently from other failures.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Timeout(_) => {
                "The server took too long to answer. Check your connection and try again.".into()
            }
            ApiError::NotAuthenticated => "You are not logged in. Run `messagehub login` first.".into(),
            ApiError::Status { status: 401, .. } => {
                "Your session has expired or is invalid. Log in again.".into()
            }
            other => format!("Request failed: {}", other),
        }
    }
}

/// Where and how a scheduled media send should happen, in the form the
/// send-media endpoint wants: local wall-clock plus offset.
#[derive(Debug, Clone)]
pub struct MediaSchedule {
    pub local_iso: String,
    pub offset_minutes: i32,
}

pub struct ApiClient {
    http: HttpClient,
    base: Url,
    token: Option<String>,
    auth_timeout: Duration,
    request_timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_http_client(base_url, HttpClient::new())
    }

    pub fn with_http_client(base_url: &str, http: HttpClient) -> Result<Self, ApiError> {
        let normalized = crate::utils::normalize_url(base_url);
        let base = Url::parse(&normalized).map_err(|source| ApiError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            http,
            base,
            token: None,
            auth_timeout: DEFAULT_AUTH_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn with_timeouts(mut self, auth: Duration, request: Duration) -> Self {
        self.auth_timeout = auth;
        self.request_timeout = request;
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base.join(path).map_err(|source| ApiError::InvalidUrl {
            url: format!("{}{}", self.base, path),
            source,
        })
    }

    fn with_auth(&self, req: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::NotAuthenticated)?;
        Ok(req.header("Authorization", format!("Bearer {}", token)))
    }

    /// Send `req` and decode its JSON reply. Hitting `limit` drops the
    /// in-flight request and yields [`ApiError::Timeout`]. Nothing is retried.
    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder, limit: Duration) -> Result<T, ApiError> {
        let call = async {
            let resp = req.send().await.map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(limit)
                } else {
                    ApiError::Transport(e)
                }
            })?;
            Self::decode(resp).await
        };
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => {
                log::warn!("request aborted after {:?}", limit);
                Err(ApiError::Timeout(limit))
            }
        }
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let status = resp.status();
        let body = resp.bytes().await.map_err(ApiError::Transport)?;
        if !status.is_success() {
            let parsed: ErrorBody = serde_json::from_slice(&body).unwrap_or_default();
            let message = parsed
                .error
                .or(parsed.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            log::debug!("HTTP {}: {}", status, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn login(&self, api_id: &str, api_hash: &str, phone_number: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            api_id,
            api_hash,
            phone_number,
        };
        let req = self.http.post(self.endpoint("api/auth/login")?).json(&body);
        self.execute(req, self.auth_timeout).await
    }

    pub async fn verify(&self, phone_number: &str, code: &str, password: Option<&str>) -> Result<VerifyResponse, ApiError> {
        let body = VerifyRequest {
            phone_number,
            code,
            password,
        };
        let req = self.http.post(self.endpoint("api/auth/verify")?).json(&body);
        self.execute(req, self.auth_timeout).await
    }

    pub async fn auth_status(&self) -> Result<AuthStatus, ApiError> {
        let req = self.with_auth(self.http.get(self.endpoint("api/auth/status")?))?;
        self.execute(req, self.request_timeout).await
    }

    pub async fn chats(&self) -> Result<Vec<Chat>, ApiError> {
        let req = self.with_auth(self.http.get(self.endpoint("api/chats")?))?;
        let resp: ChatsResponse = self.execute(req, self.request_timeout).await?;
        Ok(resp.chats)
    }

    /// Send now, or hand the backend a UTC instant to send at.
    pub async fn send(&self, recipients: &[Group], message: &str, schedule_for: Option<String>) -> Result<SendResponse, ApiError> {
        let body = SendRequest {
            recipients,
            message,
            schedule_for,
        };
        let req = self.with_auth(self.http.post(self.endpoint("api/messages/send")?))?.json(&body);
        self.execute(req, self.request_timeout).await
    }

    pub async fn send_media(
        &self,
        recipients: &[Group],
        message: &str,
        schedule: Option<&MediaSchedule>,
        attachments: Vec<Attachment>,
    ) -> Result<SendResponse, ApiError> {
        let recipients = serde_json::to_string(recipients).map_err(|e| ApiError::Decode(e.to_string()))?;
        let mut form = Form::new()
            .text("recipients", recipients)
            .text("message", message.to_string());
        if let Some(s) = schedule {
            form = form
                .text("schedule_for", s.local_iso.clone())
                .text("timezone_offset", s.offset_minutes.to_string());
        }
        for (i, a) in attachments.into_iter().enumerate() {
            let part = Part::bytes(a.bytes)
                .file_name(a.file_name)
                .mime_str(a.mime)
                .map_err(ApiError::Transport)?;
            form = form.part(format!("images{}", i), part);
        }
        let req = self
            .with_auth(self.http.post(self.endpoint("api/messages/send-media")?))?
            .multipart(form);
        self.execute(req, self.request_timeout).await
    }

    pub async fn scheduled(&self) -> Result<Vec<ScheduledMessage>, ApiError> {
        let req = self.with_auth(self.http.get(self.endpoint("api/messages/scheduled")?))?;
        let resp: ScheduledListResponse = self.execute(req, self.request_timeout).await?;
        Ok(resp.messages)
    }

    pub async fn execute_scheduled(&self, id: &str) -> Result<SendResponse, ApiError> {
        let path = format!("api/messages/execute/{}", id);
        let req = self.with_auth(self.http.post(self.endpoint(&path)?))?;
        self.execute(req, self.request_timeout).await
    }

    pub async fn delete_scheduled(&self, id: &str) -> Result<bool, ApiError> {
        let path = format!("api/messages/{}", id);
        let req = self.with_auth(self.http.delete(self.endpoint(&path)?))?;
        let resp: SuccessResponse = self.execute(req, self.request_timeout).await?;
        Ok(resp.success)
    }

    pub async fn health(&self) -> Result<Health, ApiError> {
        let req = self.http.get(self.endpoint("api/health")?);
        self.execute(req, self.request_timeout).await
    }

    pub async fn scheduler_status(&self) -> Result<SchedulerStatus, ApiError> {
        let req = self.with_auth(self.http.get(self.endpoint("api/scheduler/status")?))?;
        self.execute(req, self.request_timeout).await
    }
}

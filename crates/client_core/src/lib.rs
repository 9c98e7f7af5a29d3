use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use shared::protocol::{
    AddTextRequest, AddTextResponse, QueryRequest, QueryResponse, WelcomeResponse,
};
use thiserror::Error;
use tracing::debug;

pub mod config;
pub mod controller;

pub use config::{load_settings, ClientSettings};
pub use controller::{AnswerFallback, FormController, NewTextEntry, QueryState, SubmissionStatus};
pub use reqwest::StatusCode;

pub const ADD_TEXT_PATH: &str = "/add_text";
pub const QUERY_AI_PATH: &str = "/query_ai";
pub const WELCOME_PATH: &str = "/";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },
    #[error("malformed {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// The request never left the client, e.g. the worker queue was gone.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl ClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_timeout())
    }
}

/// Remote operations the form controller depends on.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    async fn add_text(&self, request: &AddTextRequest) -> Result<AddTextResponse, ClientError>;
    async fn query_ai(&self, request: &QueryRequest) -> Result<QueryResponse, ClientError>;
}

#[derive(Debug, Clone)]
pub struct AssistantClient {
    http: Client,
    server_url: String,
}

impl AssistantClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: trim_server_url(server_url.into()),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Build)?;
        Ok(Self {
            http,
            server_url: trim_server_url(settings.server_url.clone()),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub async fn add_text(&self, request: &AddTextRequest) -> Result<AddTextResponse, ClientError> {
        let body = self.post_json(ADD_TEXT_PATH, request).await?;
        // A 2xx reply counts as stored even when its body is empty or not JSON.
        match serde_json::from_slice::<AddTextResponse>(&body) {
            Ok(response) => Ok(response),
            Err(err) => {
                debug!(error = %err, "add_text reply carried no readable body");
                Ok(AddTextResponse::default())
            }
        }
    }

    pub async fn query_ai(&self, request: &QueryRequest) -> Result<QueryResponse, ClientError> {
        let body = self.post_json(QUERY_AI_PATH, request).await?;
        decode_body(QUERY_AI_PATH, &body)
    }

    /// Root endpoint of the backend; used as a reachability check.
    pub async fn welcome(&self) -> Result<WelcomeResponse, ClientError> {
        let res = self
            .http
            .get(self.endpoint_url(WELCOME_PATH))
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: WELCOME_PATH,
                source,
            })?;
        let body = read_success_body(WELCOME_PATH, res).await?;
        decode_body(WELCOME_PATH, &body)
    }

    async fn post_json<T>(
        &self,
        endpoint: &'static str,
        payload: &T,
    ) -> Result<Vec<u8>, ClientError>
    where
        T: Serialize + ?Sized,
    {
        debug!(endpoint, server_url = %self.server_url, "sending request");
        let res = self
            .http
            .post(self.endpoint_url(endpoint))
            .json(payload)
            .send()
            .await
            .map_err(|source| ClientError::Transport { endpoint, source })?;
        read_success_body(endpoint, res).await
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{path}", self.server_url)
    }
}

#[async_trait]
impl AssistantApi for AssistantClient {
    async fn add_text(&self, request: &AddTextRequest) -> Result<AddTextResponse, ClientError> {
        AssistantClient::add_text(self, request).await
    }

    async fn query_ai(&self, request: &QueryRequest) -> Result<QueryResponse, ClientError> {
        AssistantClient::query_ai(self, request).await
    }
}

fn trim_server_url(raw: String) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

async fn read_success_body(
    endpoint: &'static str,
    res: Response,
) -> Result<Vec<u8>, ClientError> {
    let status = res.status();
    if !status.is_success() {
        return Err(ClientError::Status { endpoint, status });
    }
    let body = res
        .bytes()
        .await
        .map_err(|source| ClientError::Transport { endpoint, source })?;
    Ok(body.to_vec())
}

fn decode_body<T: DeserializeOwned>(
    endpoint: &'static str,
    body: &[u8],
) -> Result<T, ClientError> {
    serde_json::from_slice(body).map_err(|source| ClientError::Decode { endpoint, source })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

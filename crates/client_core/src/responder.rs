//! Boundary to the remote answering service.
//!
//! [`Responder::ask`] never fails: transport errors, non-200 statuses and
//! undecodable bodies all collapse into an assistant turn carrying a fixed
//! notice, so the session can always continue.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use shared::{
    domain::Turn,
    protocol::{QueryRequest, ReplyField},
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const MISSING_REPLY_FALLBACK: &str = "I'm sorry, I couldn't retrieve the information.";
pub const MALFORMED_REPLY_FALLBACK: &str = "Sorry, I couldn't process that.";
pub const SERVER_ERROR_NOTICE: &str = "Error: Unable to get response from the server.";

#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to answering service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("answering service returned status {0}")]
    Status(StatusCode),
    #[error("answering service returned invalid json: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

#[async_trait]
pub trait Responder: Send + Sync {
    async fn ask(&self, question: &str) -> Turn;
}

/// Maps a decoded reply onto the text shown to the user.
pub fn resolve_reply(reply: ReplyField) -> String {
    match reply {
        ReplyField::PlainText(text) | ReplyField::NestedOutput(text) => text,
        ReplyField::Malformed => MALFORMED_REPLY_FALLBACK.to_string(),
        ReplyField::Missing => MISSING_REPLY_FALLBACK.to_string(),
    }
}

pub struct HttpResponder {
    http: Client,
    endpoint: Url,
}

impl HttpResponder {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, ResponderError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ResponderError::Client)?;
        Ok(Self::with_client(http, endpoint))
    }

    pub fn with_client(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn query(&self, question: &str) -> Result<ReplyField, ResponderError> {
        debug!(endpoint = %self.endpoint, "posting question to answering service");
        let res = self
            .http
            .post(self.endpoint.clone())
            .json(&QueryRequest::new(question))
            .send()
            .await?;

        let status = res.status();
        if status != StatusCode::OK {
            return Err(ResponderError::Status(status));
        }

        let bytes = res.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        Ok(ReplyField::decode(&body))
    }
}

#[async_trait]
impl Responder for HttpResponder {
    async fn ask(&self, question: &str) -> Turn {
        match self.query(question).await {
            Ok(reply) => {
                if matches!(reply, ReplyField::Missing | ReplyField::Malformed) {
                    warn!(?reply, endpoint = %self.endpoint, "unexpected reply shape; using fallback text");
                }
                Turn::assistant(resolve_reply(reply))
            }
            Err(err) => {
                warn!(error = %err, endpoint = %self.endpoint, "query failed; substituting error notice");
                Turn::assistant(SERVER_ERROR_NOTICE)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/responder_tests.rs"]
mod tests;

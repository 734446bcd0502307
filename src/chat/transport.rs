use std::future::Future;

use crate::chat::messages::{ChatRequest, ChatResponse};
use crate::errors::{OlloError, Result};

/// Sends one completion request.
pub trait ChatTransport {
    fn complete(
        &self,
        api_key: &str,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse>>;
}

/// Posts to `{endpoint}/chat/completions` with bearer auth.
#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    endpoint: String,
}

impl HttpChatTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into() }
    }

    #[must_use]
    pub fn url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }
}

impl ChatTransport for HttpChatTransport {
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<ChatResponse> {
        let body = serde_json::to_vec(request)?;

        let mut http_request = ehttp::Request::post(self.url(), body);
        http_request.headers.insert("Content-Type", "application/json");
        http_request
            .headers
            .insert("Authorization", format!("Bearer {api_key}"));

        log::debug!("POST {} ({} messages)", self.url(), request.messages.len());

        let response = ehttp::fetch_async(http_request)
            .await
            .map_err(OlloError::HttpError)?;

        if !response.ok {
            return Err(OlloError::HttpResponseError { status: response.status });
        }

        Ok(serde_json::from_slice(&response.bytes)?)
    }
}

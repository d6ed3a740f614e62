//! REST transport over `reqwest`.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use async_trait::async_trait;
use frames::{ChatMessage, Contact, Endpoints, HistoryRequest, SendRequest};
use panel::{MessageApi, PanelError};
use serde::Serialize;

use crate::error::CliError;

/// [`MessageApi`] talking to the chat server over HTTP.
#[derive(Clone, Debug)]
pub struct HttpMessageApi {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpMessageApi {
    /// # Errors
    ///
    /// Returns [`CliError::Http`] when the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, CliError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, endpoints: Endpoints::new(base_url) })
    }

    /// Every contact visible to `user_id`.
    pub async fn contacts(&self, user_id: &str) -> Result<Vec<Contact>, PanelError> {
        let response = self
            .client
            .get(self.endpoints.contacts(user_id))
            .send()
            .await
            .map_err(|e| PanelError::Request(e.to_string()))?;
        let response = check_status(response).await?;
        response
            .json::<Vec<Contact>>()
            .await
            .map_err(|e| PanelError::Decode(e.to_string()))
    }

    async fn post_json<T: Serialize + ?Sized>(&self, url: String, body: &T) -> Result<reqwest::Response, PanelError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| PanelError::Request(e.to_string()))?;
        check_status(response).await
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, PanelError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(PanelError::Status { status: status.as_u16(), body })
}

#[async_trait(?Send)]
impl MessageApi for HttpMessageApi {
    async fn fetch_history(&self, request: &HistoryRequest) -> Result<Vec<ChatMessage>, PanelError> {
        let response = self.post_json(self.endpoints.history(), request).await?;
        response
            .json::<Vec<ChatMessage>>()
            .await
            .map_err(|e| PanelError::Decode(e.to_string()))
    }

    async fn send_message(&self, request: &SendRequest) -> Result<(), PanelError> {
        self.post_json(self.endpoints.send(), request).await.map(|_| ())
    }
}

use reqwest::Url;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Status and raw body of one webhook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
}

impl WebhookResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Logic Apps style `{"error": {"code", "message"}}` bodies, if present.
    pub fn error_detail(&self) -> Option<ErrorDetail> {
        serde_json::from_str::<ErrorEnvelope>(&self.body)
            .ok()
            .map(|envelope| envelope.error)
    }
}

pub struct WebhookClient {
    client: reqwest::Client,
    url: Url,
}

impl WebhookClient {
    pub fn new(url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<WebhookResponse, reqwest::Error> {
        let response = self
            .client
            .post(self.url.clone())
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(WebhookResponse { status, body })
    }
}

use crate::io_struct::ChatRequest;
use http::header::CONTENT_TYPE;

/// The chat-completion endpoint every outbound call goes to.
///
/// Cloning is cheap: the underlying `reqwest::Client` shares one connection
/// pool across clones.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl UpstreamClient {
    pub fn new(
        client: reqwest::Client,
        url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        UpstreamClient {
            client,
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST a chat request with bearer auth and a JSON body.
    pub async fn send(&self, request: &ChatRequest) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
    }
}

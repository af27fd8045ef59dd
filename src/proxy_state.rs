use crate::compress::CompressionPolicy;
use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::header_utils::relayed_response_headers;
use crate::io_struct::ChatRequest;
use crate::summarizer::Summarizer;
use crate::upstream::UpstreamClient;
use actix_web::HttpResponse;
use bytes::Bytes;
use reqwest::StatusCode;
use std::time::Duration;

/// Upstream reply captured in full before it is relayed.
pub struct ProxyResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl ProxyResponse {
    pub async fn from_upstream(resp: reqwest::Response) -> Result<Self, ProxyError> {
        let status = resp.status();
        let headers = relayed_response_headers(resp.headers());
        let body = resp.bytes().await?;
        Ok(ProxyResponse {
            status,
            headers,
            body,
        })
    }
}

impl From<ProxyResponse> for HttpResponse {
    fn from(resp: ProxyResponse) -> Self {
        // reqwest only produces codes in 100..=999, which actix also accepts
        let status = actix_web::http::StatusCode::from_u16(resp.status.as_u16())
            .unwrap_or(actix_web::http::StatusCode::BAD_GATEWAY);
        let mut builder = HttpResponse::build(status);
        // repeated headers are relayed as separate lines
        for (name, value) in resp.headers {
            builder.append_header((name, value));
        }
        builder.body(resp.body)
    }
}

/// Per-process state shared by all request handlers. Holds no per-request data.
#[derive(Debug, Clone)]
pub struct ProxyState {
    pub upstream: UpstreamClient,
    pub summarizer: Summarizer,
    pub policy: CompressionPolicy,
}

impl ProxyState {
    pub fn new(config: &ProxyConfig) -> anyhow::Result<Self> {
        let mut builder =
            reqwest::Client::builder().pool_idle_timeout(Some(Duration::from_secs(50)));
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let upstream = UpstreamClient::new(client, &config.upstream_url, &config.api_key);
        let summarizer = Summarizer::new(upstream.clone(), config);
        Ok(Self {
            upstream,
            summarizer,
            policy: config.compression_policy(),
        })
    }

    /// Compress the conversation if it is long enough, then relay it upstream.
    ///
    /// The summarization call completes before forwarding starts. Both calls
    /// are awaited inside the caller's handler future and nothing is spawned,
    /// so a caller that disconnects drops the future and aborts whichever
    /// upstream call is in flight.
    pub async fn chat_completions(&self, mut req: ChatRequest) -> Result<HttpResponse, ProxyError> {
        req.messages = self
            .policy
            .compress_if_needed(req.messages, &self.summarizer)
            .await;
        Ok(self.forward(&req).await?.into())
    }

    /// Send the request upstream once. A non-success upstream status is not an
    /// error here; it is relayed like any other response.
    pub async fn forward(&self, req: &ChatRequest) -> Result<ProxyResponse, ProxyError> {
        let resp = self.upstream.send(req).await.map_err(|e| {
            log::error!("Failed to send request to {}: {}", self.upstream.url(), e);
            ProxyError::UpstreamForward(e)
        })?;
        log::debug!(
            "Upstream {} answered {} for {} messages",
            self.upstream.url(),
            resp.status(),
            req.messages.len()
        );
        ProxyResponse::from_upstream(resp).await.inspect_err(|e| {
            log::error!("Failed to read upstream response: {}", e);
        })
    }
}

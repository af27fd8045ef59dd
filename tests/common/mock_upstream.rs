use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use bytes::Bytes;
use serde_json::{Value, json};
use std::sync::Mutex;

/// Canned reply for one kind of upstream call.
#[derive(Clone, Debug)]
pub struct MockReply {
    pub status: u16,
    pub body: String,
}

impl MockReply {
    pub fn ok(body: Value) -> Self {
        MockReply {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        MockReply {
            status,
            body: body.to_string(),
        }
    }

    /// A completion whose first choice carries `content`.
    pub fn completion(content: &str) -> Self {
        MockReply::ok(json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        }))
    }
}

/// Configuration for mock upstream behavior
#[derive(Clone, Debug)]
pub struct MockUpstreamConfig {
    /// Requests whose `model` equals this are answered with `summary`
    pub summarize_model: String,
    pub summary: MockReply,
    pub completion: MockReply,
}

impl Default for MockUpstreamConfig {
    fn default() -> Self {
        MockUpstreamConfig {
            summarize_model: "gpt-4o-mini".to_string(),
            summary: MockReply::completion("Discussed migrating service X; deadline March."),
            completion: MockReply::completion("Hello from upstream"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

impl RecordedRequest {
    pub fn model(&self) -> &str {
        self.body["model"].as_str().unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<sgl_ctx_proxy::io_struct::Message> {
        serde_json::from_value(self.body["messages"].clone()).unwrap()
    }
}

struct MockState {
    config: MockUpstreamConfig,
    received: Mutex<Vec<RecordedRequest>>,
}

/// Chat-completion upstream served on an ephemeral local port
pub struct MockUpstream {
    pub url: String,
    state: web::Data<MockState>,
    handle: ServerHandle,
}

impl MockUpstream {
    pub async fn start(config: MockUpstreamConfig) -> std::io::Result<Self> {
        let state = web::Data::new(MockState {
            config,
            received: Mutex::new(Vec::new()),
        });

        let app_state = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(app_state.clone())
                .route("/v1/chat/completions", web::post().to(chat_completions_handler))
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))?;

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Ok(MockUpstream {
            url: format!("http://{}/v1/chat/completions", addr),
            state,
            handle,
        })
    }

    pub fn received(&self) -> Vec<RecordedRequest> {
        self.state.received.lock().unwrap().clone()
    }

    pub fn summary_requests(&self) -> Vec<RecordedRequest> {
        let model = self.state.config.summarize_model.clone();
        self.received()
            .into_iter()
            .filter(|r| r.model() == model)
            .collect()
    }

    pub fn forwarded_requests(&self) -> Vec<RecordedRequest> {
        let model = self.state.config.summarize_model.clone();
        self.received()
            .into_iter()
            .filter(|r| r.model() != model)
            .collect()
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

async fn chat_completions_handler(
    req: HttpRequest,
    body: Bytes,
    state: web::Data<MockState>,
) -> HttpResponse {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let is_summary = body["model"] == state.config.summarize_model.as_str();

    state.received.lock().unwrap().push(RecordedRequest {
        authorization: header("authorization"),
        content_type: header("content-type"),
        body,
    });

    let reply = if is_summary {
        &state.config.summary
    } else {
        &state.config.completion
    };
    HttpResponse::build(StatusCode::from_u16(reply.status).unwrap())
        .content_type("application/json")
        .insert_header(("x-request-id", "mock-req-1"))
        .insert_header(("x-upstream-node", "edge-7"))
        .append_header(("cache-control", "no-cache"))
        .append_header(("cache-control", "no-store"))
        .body(reply.body.clone())
}

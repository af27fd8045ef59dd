use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::io_struct::ChatRequest;
use crate::logging;
use crate::proxy_state::ProxyState;
use actix_web::{HttpRequest, HttpResponse, HttpServer, post, web};
use bytes::Bytes;

#[post("/v1/chat/completions")]
pub async fn chat_completions(
    body: Bytes,
    app_state: web::Data<ProxyState>,
) -> Result<HttpResponse, ProxyError> {
    let req = ChatRequest::from_slice(&body).inspect_err(|e| {
        log::warn!("Rejected chat completion request: {}", e);
    })?;
    app_state.chat_completions(req).await
}

/// Answers without reading the body; actix discards whatever the caller sent.
async fn sink_handler(req: HttpRequest) -> HttpResponse {
    log::debug!("No route for {} {}", req.method(), req.path());
    HttpResponse::NotFound().body("Not found")
}

/// Routes served by the proxy. Anything unmatched, including non-POST methods
/// on the chat path, is answered with 404.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(chat_completions)
        .default_service(web::route().to(sink_handler));
}

pub async fn startup(config: ProxyConfig) -> anyhow::Result<()> {
    logging::init_logging(config.verbose);

    let app_state = web::Data::new(ProxyState::new(&config)?);
    let max_payload_size = config.max_payload_size;

    log::info!("Starting proxy at {}:{}", config.host, config.port);
    log::info!("Upstream: {}", config.upstream_url);
    log::info!(
        "Compression: more than {} messages -> summary + last {} (summarizer: {})",
        config.min_msgs_to_summarize,
        config.max_recent_msgs,
        config.summarize_model
    );

    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(app_state.clone())
            .app_data(web::PayloadConfig::default().limit(max_payload_size))
            .configure(configure)
    })
    .bind((config.host, config.port))?
    .run()
    .await?;

    Ok(())
}

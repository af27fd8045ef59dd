use clap::Parser;
use sgl_ctx_proxy::config::{ConfigValidator, DEFAULT_SUMMARIZE_MODEL, ProxyConfig};
use sgl_ctx_proxy::server;
use tokio::signal;

#[derive(Parser, Debug)]
#[command(name = "sgl-ctx-proxy")]
#[command(about = "Chat-completion proxy that summarizes early history of long conversations")]
struct CliArgs {
    /// Load the whole configuration from a JSON file instead of flags
    #[arg(long, env = "CTX_PROXY_CONFIG")]
    config: Option<String>,

    /// Host address to bind the proxy server
    #[arg(long, env = "CTX_PROXY_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the proxy server
    #[arg(long, env = "CTX_PROXY_PORT", default_value_t = 8081)]
    port: u16,

    /// Upstream chat-completion URL (e.g., https://gateway/v1/chat/completions)
    #[arg(long, env = "CTX_PROXY_UPSTREAM_URL", default_value = "")]
    upstream_url: String,

    /// API key sent to the upstream as a bearer token
    #[arg(long, env = "CTX_PROXY_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// Model used to summarize early history
    #[arg(long, env = "CTX_PROXY_SUMMARIZE_MODEL", default_value = DEFAULT_SUMMARIZE_MODEL)]
    summarize_model: String,

    /// Summarize only when a request has more messages than this
    #[arg(long, env = "CTX_PROXY_MIN_MSGS_TO_SUMMARIZE", default_value_t = 11)]
    min_msgs_to_summarize: usize,

    /// Number of recent messages kept verbatim after compression
    #[arg(long, env = "CTX_PROXY_MAX_RECENT_MSGS", default_value_t = 10)]
    max_recent_msgs: usize,

    /// Maximum characters of history sent to the summarizer
    #[arg(long, env = "CTX_PROXY_SUMMARY_INPUT_MAX_CHARS", default_value_t = 12000)]
    summary_input_max_chars: usize,

    /// Maximum characters kept from the returned summary
    #[arg(long, env = "CTX_PROXY_SUMMARY_MAX_CHARS", default_value_t = 150)]
    summary_max_chars: usize,

    /// Maximum payload size in bytes
    #[arg(long, env = "CTX_PROXY_MAX_PAYLOAD_SIZE", default_value_t = 268435456)] // 256MB
    max_payload_size: usize,

    /// Upstream request timeout in seconds (unset = no timeout override)
    #[arg(long, env = "CTX_PROXY_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,

    /// Enable debug logging
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

impl CliArgs {
    fn to_proxy_config(&self) -> anyhow::Result<ProxyConfig> {
        if let Some(path) = &self.config {
            return Ok(ProxyConfig::from_file(path)?);
        }
        Ok(ProxyConfig {
            host: self.host.clone(),
            port: self.port,
            upstream_url: self.upstream_url.clone(),
            api_key: self.api_key.clone(),
            summarize_model: self.summarize_model.clone(),
            min_msgs_to_summarize: self.min_msgs_to_summarize,
            max_recent_msgs: self.max_recent_msgs,
            summary_input_max_chars: self.summary_input_max_chars,
            summary_max_chars: self.summary_max_chars,
            max_payload_size: self.max_payload_size,
            request_timeout_secs: self.request_timeout_secs,
            verbose: self.verbose,
        })
    }
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = args.to_proxy_config()?;
    ConfigValidator::validate(&config)?;

    actix_web::rt::System::new().block_on(async move {
        tokio::select! {
            res = server::startup(config) => res,
            _ = signal::ctrl_c() => {
                log::info!("Received Ctrl+C, shutting down");
                Ok(())
            }
        }
    })
}

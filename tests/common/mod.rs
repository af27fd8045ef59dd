// These modules are used by integration tests
#![allow(dead_code)]

pub mod mock_upstream;

use sgl_ctx_proxy::config::ProxyConfig;
use sgl_ctx_proxy::io_struct::Message;

pub const TEST_API_KEY: &str = "test-key";

/// Proxy configuration pointing at `upstream_url` with default thresholds.
pub fn test_config(upstream_url: &str) -> ProxyConfig {
    ProxyConfig {
        upstream_url: upstream_url.to_string(),
        api_key: TEST_API_KEY.to_string(),
        ..Default::default()
    }
}

/// Alternating user/assistant turns with distinguishable contents.
pub fn conversation(len: usize) -> Vec<Message> {
    (0..len)
        .map(|i| {
            let role = if i % 2 == 0 { "user" } else { "assistant" };
            Message::new(role, format!("turn {} content", i))
        })
        .collect()
}

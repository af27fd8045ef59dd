use http::HeaderMap;

/// Response headers relayed to the caller verbatim.
const RELAYED_HEADERS: &[&str] = &[
    "content-type",
    "cache-control",
    "retry-after",
    "x-request-id",
];

/// Header families relayed by prefix (rate-limit hints, provider metadata).
const RELAYED_PREFIXES: &[&str] = &["x-ratelimit-", "openai-"];

/// Determine if an upstream response header should reach the caller
/// (case-insensitive). Everything not on the allow-list is dropped, which
/// covers hop-by-hop and transport headers such as `connection`,
/// `transfer-encoding` and `content-length`.
pub fn should_relay_header(name: &str) -> bool {
    RELAYED_HEADERS
        .iter()
        .any(|allowed| name.eq_ignore_ascii_case(allowed))
        || RELAYED_PREFIXES.iter().any(|prefix| {
            name.len() > prefix.len()
                && name
                    .get(..prefix.len())
                    .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        })
}

/// Allow-listed upstream headers as name-value string pairs, skipping
/// non-UTF8 values.
pub fn relayed_response_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter(|(name, _)| should_relay_header(name.as_str()))
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.to_string(), v.to_string()))
        })
        .collect()
}

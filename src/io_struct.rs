use crate::error::ProxyError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Absent or `null` fields decode to their empty value; type mismatches are
/// still rejected.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Message {
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    // tool-call turns carry `"content": null`
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Message {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Message::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message::new("user", content)
    }
}

/// Chat-completion request body as accepted from callers and sent upstream.
///
/// Fields other than `model` and `messages` are kept in `other` and written
/// back unchanged when the request is forwarded.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<Message>,

    #[serde(flatten, default)]
    pub other: Map<String, Value>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        ChatRequest {
            model: model.into(),
            messages,
            other: Map::new(),
        }
    }

    pub fn from_slice(body: &[u8]) -> Result<Self, ProxyError> {
        serde_json::from_slice(body).map_err(ProxyError::MalformedInput)
    }
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Message,
}

/// Only the part of a completion response the summarizer reads.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_keeps_extra_fields() {
        let body = json!({
            "model": "gpt-4o",
            "messages": [{"role": "user", "content": "hi"}],
            "temperature": 0.2,
            "stream": false
        });
        let req = ChatRequest::from_slice(body.to_string().as_bytes()).unwrap();
        assert_eq!(req.model, "gpt-4o");
        assert_eq!(req.messages, vec![Message::user("hi")]);
        assert_eq!(req.other.get("temperature"), Some(&json!(0.2)));

        let round = serde_json::to_value(&req).unwrap();
        assert_eq!(round, body);
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = ChatRequest::from_slice(b"not json").unwrap_err();
        assert!(matches!(err, ProxyError::MalformedInput(_)));
    }

    #[test]
    fn test_parse_missing_fields_default_to_empty() {
        let req = ChatRequest::from_slice(br#"{"model": "m"}"#).unwrap();
        assert!(req.messages.is_empty());

        let req = ChatRequest::from_slice(
            br#"{"messages": [{"role": "user", "content": "hi"}]}"#,
        )
        .unwrap();
        assert_eq!(req.model, "");
        assert_eq!(req.messages, vec![Message::user("hi")]);
    }

    #[test]
    fn test_parse_null_content() {
        let req = ChatRequest::from_slice(
            br#"{"model":"m","messages":[{"role":"user","content":"hi"},{"role":"assistant","content":null}]}"#,
        )
        .unwrap();
        assert_eq!(req.messages[1], Message::new("assistant", ""));

        let req = ChatRequest::from_slice(br#"{"model": null, "messages": null}"#).unwrap();
        assert_eq!(req, ChatRequest::new("", vec![]));
    }

    #[test]
    fn test_parse_rejects_type_mismatch() {
        let err = ChatRequest::from_slice(
            br#"{"model": "m", "messages": [{"role": "user", "content": ["part"]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ProxyError::MalformedInput(_)));

        let err = ChatRequest::from_slice(br#"{"model": "m", "messages": "hi"}"#).unwrap_err();
        assert!(matches!(err, ProxyError::MalformedInput(_)));
    }

    #[test]
    fn test_unknown_roles_pass_through() {
        let req = ChatRequest::from_slice(
            br#"{"model": "m", "messages": [{"role": "tool", "content": "42"}]}"#,
        )
        .unwrap();
        assert_eq!(req.messages[0].role, "tool");
    }

    #[test]
    fn test_new_request_serializes_two_fields() {
        let req = ChatRequest::new("gpt-4o-mini", vec![Message::system("s")]);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"model": "gpt-4o-mini", "messages": [{"role": "system", "content": "s"}]})
        );
    }

    #[test]
    fn test_decode_chat_response() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "id": "x",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "ok"}}]
        }))
        .unwrap();
        assert_eq!(resp.choices[0].message.content, "ok");
    }
}

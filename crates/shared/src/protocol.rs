use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level field of a query response that carries the reply.
pub const REPLY_FIELD: &str = "response";
/// Field inside an object-shaped reply that carries the literal text.
pub const NESTED_OUTPUT_FIELD: &str = "output";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

impl QueryRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// Shape of the reply field in a successful query response, decoded once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyField {
    /// `{"response": "text"}`
    PlainText(String),
    /// `{"response": {"output": "text"}}`
    NestedOutput(String),
    /// No `response` field, or the body is not a JSON object.
    Missing,
    /// `response` present but null, an array, or an object without a usable `output`.
    Malformed,
}

impl ReplyField {
    pub fn decode(body: &Value) -> Self {
        let Some(reply) = body.as_object().and_then(|obj| obj.get(REPLY_FIELD)) else {
            return Self::Missing;
        };

        match reply {
            Value::Object(nested) => nested
                .get(NESTED_OUTPUT_FIELD)
                .and_then(scalar_text)
                .map_or(Self::Malformed, Self::NestedOutput),
            other => scalar_text(other).map_or(Self::Malformed, Self::PlainText),
        }
    }
}

/// Strings as-is; numbers and booleans in their JSON spelling.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn query_request_wire_shape() {
        let body = serde_json::to_value(QueryRequest::new("How can I sleep better?"))
            .expect("serialize");
        assert_eq!(body, json!({ "question": "How can I sleep better?" }));
    }

    #[test]
    fn decodes_plain_text_reply() {
        assert_eq!(
            ReplyField::decode(&json!({ "response": "Take a walk daily." })),
            ReplyField::PlainText("Take a walk daily.".to_string())
        );
    }

    #[test]
    fn decodes_nested_output_reply() {
        assert_eq!(
            ReplyField::decode(&json!({ "response": { "output": "Drink more water." } })),
            ReplyField::NestedOutput("Drink more water.".to_string())
        );
    }

    #[test]
    fn nested_object_without_usable_output_is_malformed() {
        assert_eq!(
            ReplyField::decode(&json!({ "response": {} })),
            ReplyField::Malformed
        );
        assert_eq!(
            ReplyField::decode(&json!({ "response": { "output": null } })),
            ReplyField::Malformed
        );
        assert_eq!(
            ReplyField::decode(&json!({ "response": { "output": ["a"] } })),
            ReplyField::Malformed
        );
    }

    #[test]
    fn scalar_replies_are_rendered_as_text() {
        assert_eq!(
            ReplyField::decode(&json!({ "response": 42 })),
            ReplyField::PlainText("42".to_string())
        );
        assert_eq!(
            ReplyField::decode(&json!({ "response": true })),
            ReplyField::PlainText("true".to_string())
        );
        assert_eq!(
            ReplyField::decode(&json!({ "response": { "output": 3.5 } })),
            ReplyField::NestedOutput("3.5".to_string())
        );
    }

    #[test]
    fn null_or_array_reply_is_malformed() {
        assert_eq!(
            ReplyField::decode(&json!({ "response": null })),
            ReplyField::Malformed
        );
        assert_eq!(
            ReplyField::decode(&json!({ "response": ["a", "b"] })),
            ReplyField::Malformed
        );
    }

    #[test]
    fn absent_reply_field_is_missing() {
        assert_eq!(
            ReplyField::decode(&json!({ "answer": "x" })),
            ReplyField::Missing
        );
        assert_eq!(ReplyField::decode(&json!(["x"])), ReplyField::Missing);
    }
}

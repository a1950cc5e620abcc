//! Schema instructions and structured-output parsing.
//!
//! Models are asked to reply with a JSON document matching the output type's
//! schema. Replies rarely arrive as bare JSON, so parsing first extracts the
//! most plausible JSON span (a fenced code block, else the outermost braces
//! or brackets) before deserializing.

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{AgentError, AgentResult};
use crate::models::Content;

/// Builds the system instructions that ask for output matching `T`'s schema.
pub(crate) fn schema_instructions<T: JsonSchema>() -> AgentResult<String> {
    let schema: Value = serde_json::to_value(schema_for!(T))?;
    let schema_text = serde_json::to_string_pretty(&schema)?;

    Ok(format!(
        "Your final reply must be a single JSON document matching this schema \
         for `{}`:\n\n{}\n\n\
         Rules:\n\
         - Reply with JSON only, no surrounding prose.\n\
         - Do not wrap the JSON in markdown code fences.\n\
         - Include every required field.",
        std::any::type_name::<T>(),
        schema_text
    ))
}

/// Parses the assistant content into `T`.
pub(crate) fn parse_output<T: DeserializeOwned>(content: &Content) -> AgentResult<T> {
    let text = content
        .joined_texts()
        .ok_or_else(|| AgentError::Validation {
            field: "structured_output".to_string(),
            reason: "reply contains no text to parse".to_string(),
        })?;

    let candidate = extract_json_candidate(&text);

    serde_json::from_str(candidate).map_err(|err| AgentError::Serialization {
        format: std::any::type_name::<T>().to_string(),
        reason: err.to_string(),
    })
}

/// Picks the substring most likely to be the intended JSON document.
fn extract_json_candidate(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(fenced) = extract_fenced_block(trimmed) {
        return fenced;
    }

    if let Some(span) = extract_delimited(trimmed, '{', '}') {
        return span;
    }
    if let Some(span) = extract_delimited(trimmed, '[', ']') {
        return span;
    }

    trimmed
}

fn extract_fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    let body_start = after_fence.find('\n')?;
    let body = &after_fence[body_start + 1..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

fn extract_delimited(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Reply {
        response: String,
        needs_escalation: bool,
    }

    #[test]
    fn parses_bare_json() {
        let content = Content::from_text(r#"{"response": "Hi", "needs_escalation": false}"#);
        let reply: Reply = parse_output(&content).expect("parse");
        assert_eq!(reply.response, "Hi");
        assert!(!reply.needs_escalation);
    }

    #[test]
    fn parses_fenced_json() {
        let content = Content::from_text(
            "```json\n{\"response\": \"Hi\", \"needs_escalation\": true}\n```",
        );
        let reply: Reply = parse_output(&content).expect("parse");
        assert!(reply.needs_escalation);
    }

    #[test]
    fn parses_json_embedded_in_prose() {
        let content = Content::from_text(
            "Here is the answer: {\"response\": \"Done\", \"needs_escalation\": false} hope it helps",
        );
        let reply: Reply = parse_output(&content).expect("parse");
        assert_eq!(reply.response, "Done");
    }

    #[test]
    fn fails_without_text() {
        let err = parse_output::<Reply>(&Content::default()).expect_err("no text");
        assert!(matches!(err, AgentError::Validation { .. }));
    }

    #[test]
    fn fails_on_schema_mismatch() {
        let content = Content::from_text(r#"{"response": "Hi"}"#);
        let err = parse_output::<Reply>(&content).expect_err("missing field");
        assert!(matches!(err, AgentError::Serialization { .. }));
    }

    #[test]
    fn schema_instructions_mention_type_and_fields() {
        #[derive(schemars::JsonSchema)]
        #[allow(dead_code)]
        struct Sample {
            answer: String,
        }

        let instructions = schema_instructions::<Sample>().expect("schema");
        assert!(instructions.contains("Sample"));
        assert!(instructions.contains("answer"));
    }
}

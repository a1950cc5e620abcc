//! Conversation primitives: roles, content, messages, and conversations.
//!
//! A [`Conversation`] is the unit of input to a model: an optional system
//! text plus an ordered list of [`Message`]s. The transcript returned from an
//! agent run is also a `Conversation`, so it can be extended and fed back in
//! as message history for a follow-up turn.
//!
//! # Examples
//!
//! ```ignore
//! use deskagent::models::{Conversation, Message};
//!
//! // A single user question
//! let conversation = Conversation::from_user("How can I track my order?");
//!
//! // With a system text and history
//! let conversation = Conversation::from_system("You are a support agent")
//!     .add(Message::user("Hello"))
//!     .add(Message::assistant("Hi! How can I help?"));
//! ```

use serde::{Deserialize, Serialize};

use crate::tools::{ToolCall, ToolReply};

/// The role of a participant in a conversation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A segment of message content: text, a tool call, or a tool reply.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Part {
    Text(String),
    ToolCall(ToolCall),
    ToolReply(ToolReply),
}

impl Part {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let Self::Text(text) = self {
            Some(text.as_str())
        } else {
            None
        }
    }

    #[must_use]
    pub fn into_text(self) -> Option<String> {
        if let Self::Text(text) = self {
            Some(text)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_tool_call(&self) -> Option<&ToolCall> {
        if let Self::ToolCall(call) = self {
            Some(call)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_tool_reply(&self) -> Option<&ToolReply> {
        if let Self::ToolReply(reply) = self {
            Some(reply)
        } else {
            None
        }
    }
}

impl From<String> for Part {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Part {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<ToolCall> for Part {
    fn from(call: ToolCall) -> Self {
        Self::ToolCall(call)
    }
}

impl From<ToolReply> for Part {
    fn from(reply: ToolReply) -> Self {
        Self::ToolReply(reply)
    }
}

/// A container for the parts that make up one message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Content {
    parts: Vec<Part>,
}

impl Content {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn from_parts(parts: impl Into<Vec<Part>>) -> Self {
        Self {
            parts: parts.into(),
        }
    }

    pub fn push(&mut self, part: impl Into<Part>) {
        self.parts.push(part.into());
    }

    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    #[must_use]
    pub fn into_parts(self) -> Vec<Part> {
        self.parts
    }

    /// Returns all text parts.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.parts.iter().filter_map(Part::as_text).collect()
    }

    /// Returns the first text part, if any.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.parts.iter().find_map(Part::as_text)
    }

    /// Joins all text parts into one string, or `None` if there is no text.
    #[must_use]
    pub fn joined_texts(&self) -> Option<String> {
        let texts = self.texts();
        if texts.is_empty() {
            return None;
        }
        Some(texts.join("\n\n"))
    }

    /// Returns all tool call parts.
    #[must_use]
    pub fn tool_calls(&self) -> Vec<&ToolCall> {
        self.parts.iter().filter_map(Part::as_tool_call).collect()
    }

    /// Returns all tool reply parts.
    #[must_use]
    pub fn tool_replies(&self) -> Vec<&ToolReply> {
        self.parts.iter().filter_map(Part::as_tool_reply).collect()
    }

    #[must_use]
    pub fn has_tool_calls(&self) -> bool {
        self.parts.iter().any(|p| p.as_tool_call().is_some())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::from_text(text)
    }
}

impl From<&String> for Content {
    fn from(text: &String) -> Self {
        Self::from_text(text.clone())
    }
}

impl From<Part> for Content {
    fn from(part: Part) -> Self {
        Self { parts: vec![part] }
    }
}

impl From<Vec<Part>> for Content {
    fn from(parts: Vec<Part>) -> Self {
        Self { parts }
    }
}

impl From<Vec<ToolCall>> for Content {
    fn from(calls: Vec<ToolCall>) -> Self {
        Self {
            parts: calls.into_iter().map(Part::ToolCall).collect(),
        }
    }
}

impl From<ToolReply> for Content {
    fn from(reply: ToolReply) -> Self {
        Self {
            parts: vec![Part::ToolReply(reply)],
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: Content,
}

impl Message {
    pub fn system(content: impl Into<Content>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<Content>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<Content>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    #[must_use]
    pub const fn role(&self) -> &Role {
        &self.role
    }

    #[must_use]
    pub const fn content(&self) -> &Content {
        &self.content
    }

    #[must_use]
    pub fn into_content(self) -> Content {
        self.content
    }
}

impl From<ToolReply> for Message {
    fn from(reply: ToolReply) -> Self {
        Self {
            role: Role::Tool,
            content: Content::from(reply),
        }
    }
}

impl From<Vec<ToolCall>> for Message {
    fn from(calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: Content::from(calls),
        }
    }
}

/// A conversation: optional system text plus an ordered list of messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    system: Option<String>,
    #[serde(default)]
    messages: Vec<Message>,
}

impl Conversation {
    #[must_use]
    pub const fn new(messages: Vec<Message>) -> Self {
        Self {
            system: None,
            messages,
        }
    }

    pub fn from_system(system: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            messages: Vec::new(),
        }
    }

    pub fn from_user(text: impl Into<String>) -> Self {
        Self {
            system: None,
            messages: vec![Message::user(text.into())],
        }
    }

    /// Sets or replaces the system text.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Appends a single message.
    #[must_use]
    pub fn add(mut self, message: impl Into<Message>) -> Self {
        self.messages.push(message.into());
        self
    }

    /// Appends multiple messages.
    #[must_use]
    pub fn add_all<I>(mut self, messages: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Message>,
    {
        self.messages.extend(messages.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn system(&self) -> Option<&str> {
        self.system.as_deref()
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    #[must_use]
    pub fn into_parts(self) -> (Option<String>, Vec<Message>) {
        (self.system, self.messages)
    }

    /// Renders the conversation as readable text, one block per message.
    ///
    /// Tool calls and replies are summarized rather than serialized in full.
    #[must_use]
    pub fn to_text(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();

        if let Some(system) = &self.system {
            let _ = write!(out, "<System>\n{system}\n</System>");
        }

        for message in &self.messages {
            if !out.is_empty() {
                out.push_str("\n\n");
            }

            let mut body = String::new();
            for part in message.content().parts() {
                if !body.is_empty() {
                    body.push('\n');
                }
                match part {
                    Part::Text(text) => body.push_str(text),
                    Part::ToolCall(call) => {
                        let _ = write!(body, "[tool call {}: {}]", call.id(), call.name());
                    }
                    Part::ToolReply(reply) => {
                        let summary = if reply.outcome().is_success() {
                            reply.outcome().data().to_string()
                        } else {
                            format!(
                                "error: {}",
                                reply.outcome().error_message().unwrap_or("unknown")
                            )
                        };
                        let _ = write!(body, "[tool reply {}: {}]", reply.call_id(), summary);
                    }
                }
            }

            let role = message.role();
            let _ = write!(out, "<{role}>\n{body}\n</{role}>");
        }

        out
    }
}

impl From<&str> for Conversation {
    /// Treats the string as a single user message.
    fn from(text: &str) -> Self {
        Self::from_user(text)
    }
}

impl From<String> for Conversation {
    fn from(text: String) -> Self {
        Self::from_user(text)
    }
}

impl From<&String> for Conversation {
    fn from(text: &String) -> Self {
        Self::from_user(text.clone())
    }
}

impl From<Message> for Conversation {
    fn from(message: Message) -> Self {
        Self::new(vec![message])
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self::new(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolOutcome;
    use serde_json::json;

    #[test]
    fn system_and_message_helpers_work() {
        let conversation = Conversation::from_system("Be concise")
            .add(Message::user("Hi"))
            .add(Message::assistant("Hello"));

        assert_eq!(conversation.system(), Some("Be concise"));
        assert_eq!(conversation.messages().len(), 2);
        assert_eq!(conversation.messages()[0].role(), &Role::User);
    }

    #[test]
    fn conversions_create_expected_conversations() {
        let from_str = Conversation::from("Hi there");
        assert_eq!(from_str.messages()[0].role(), &Role::User);

        let from_message = Conversation::from(Message::assistant("Ready"));
        assert_eq!(from_message.messages()[0].role(), &Role::Assistant);
    }

    #[test]
    fn joined_texts_merges_parts() {
        let content = Content::from_parts(vec![Part::from("one"), Part::from("two")]);
        assert_eq!(content.joined_texts().as_deref(), Some("one\n\ntwo"));
        assert_eq!(content.first_text(), Some("one"));

        let empty = Content::default();
        assert!(empty.joined_texts().is_none());
    }

    #[test]
    fn to_text_renders_all_roles() {
        let reply = ToolReply::new("call-1", ToolOutcome::success(json!({"ok": true})));
        let conversation = Conversation::from_system("Help out")
            .add(Message::user("Status?"))
            .add(Message::from(vec![ToolCall::new(
                "call-1",
                "lookup",
                json!({}),
            )]))
            .add(Message::from(reply));

        let text = conversation.to_text();
        assert!(text.contains("<System>"));
        assert!(text.contains("<User>"));
        assert!(text.contains("[tool call call-1: lookup]"));
        assert!(text.contains("[tool reply call-1"));
    }
}

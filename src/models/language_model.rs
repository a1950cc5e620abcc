//! The provider-facing model trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::AgentResult;
use crate::models::{Completion, Conversation};
use crate::tools::Toolset;

/// A chat completion model.
///
/// Implementations translate a [`Conversation`] into one provider request and
/// return the assistant's reply as a [`Completion`]. Tool execution is the
/// agent's job; a model only advertises the tools so the provider can emit
/// tool calls.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider-specific model identifier, e.g. `"gpt-4o"`.
    fn model_name(&self) -> &str;

    /// Requests one completion for the conversation.
    ///
    /// When `toolset` is provided, its tool specs are attached to the request
    /// so the reply may contain tool calls instead of (or alongside) text.
    async fn complete(
        &self,
        conversation: Conversation,
        toolset: Option<Arc<dyn Toolset>>,
    ) -> AgentResult<Completion>;
}

/// Convenience methods for any [`LanguageModel`].
#[async_trait]
pub trait LanguageModelExt: LanguageModel {
    /// One-shot completion without tools.
    async fn prompt<T>(&self, input: T) -> AgentResult<Completion>
    where
        T: Into<Conversation> + Send,
    {
        self.complete(input.into(), None).await
    }
}

#[async_trait]
impl<M: LanguageModel + ?Sized> LanguageModelExt for M {}

//! Model abstractions: conversations, completions, and providers.

mod chat;
mod completion;
mod language_model;
pub mod openai;

pub use chat::{Content, Conversation, Message, Part, Role};
pub use completion::{Completion, TokenUsage};
pub use language_model::{LanguageModel, LanguageModelExt};
pub use openai::OpenAiChat;

//! Agents: the run loop tying models, tools, and typed outputs together.
//!
//! Two flavors are provided:
//!
//! - [`ChatAgent`] returns the reply text as-is.
//! - [`Agent<T, D>`] parses the reply into `T` and supports per-run
//!   dependencies `D` for dynamic instructions and tool context.
//!
//! Both return an [`AgentRun`] carrying the output, the transcript, and the
//! summed token usage.

mod chat;
mod output;
mod runner;
mod structured;

pub use chat::{ChatAgent, ChatAgentBuilder};
pub use runner::AgentRun;
pub use structured::{Agent, AgentBuilder};

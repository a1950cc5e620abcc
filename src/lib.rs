//! Typed LLM agents for customer-support workflows.
//!
//! `deskagent` wires chat completion models, tools, and typed outputs into a
//! small agent runtime:
//!
//! - [`agent::ChatAgent`] for free-text replies with reusable transcripts
//! - [`agent::Agent`] for structured outputs validated against a JSON Schema,
//!   with per-run dependency injection and validation retries
//! - [`tools`] for function tools the model can call mid-run
//! - [`models`] for the provider abstraction and the OpenAI implementation
//! - [`testing`] for scripted models and recording tools in tests
//!
//! See the `demos/` directory for end-to-end walkthroughs.

pub mod agent;
pub mod errors;
pub mod models;
pub mod render;
pub mod testing;
pub mod tools;

pub use errors::{AgentError, AgentResult};

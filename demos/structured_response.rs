//! Support agent with a structured, schema-validated reply.
//!
//! ```sh
//! cargo run --example structured_response
//! ```

use deskagent::agent::Agent;
use deskagent::models::OpenAiChat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Structured verdict the agent must produce for every ticket.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
struct SupportReply {
    /// The reply shown to the customer.
    response: String,
    /// Whether a human agent should take over.
    needs_escalation: bool,
    /// Whether the customer should be contacted again later.
    follow_up_required: bool,
    /// Customer sentiment, e.g. "positive", "neutral", "negative".
    sentiment: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    dotenvy::dotenv().ok();

    let model = OpenAiChat::from_env("gpt-4o")?;
    let agent: Agent<SupportReply> = Agent::builder(model)
        .with_instructions("You are a customer support agent for an online store.")
        .build();

    let run = agent
        .run("I ordered headphones two weeks ago and they still have not arrived. \
              This is really frustrating.")
        .await?;

    println!("{}", serde_json::to_string_pretty(run.output())?);
    println!("usage: {:?}", run.usage());

    Ok(())
}

//! Free-text support agent with a follow-up turn reusing the transcript.
//!
//! Requires `OPENAI_API_KEY` in the environment or a `.env` file:
//!
//! ```sh
//! cargo run --example simple_agent
//! ```

use deskagent::agent::ChatAgent;
use deskagent::models::{Message, OpenAiChat};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    dotenvy::dotenv().ok();

    let model = OpenAiChat::from_env("gpt-4o")?;
    let agent = ChatAgent::builder(model)
        .with_instructions("You are a customer support agent for an online store. Be concise.")
        .build();

    println!("=== first question ===");
    let run = agent.run("How can I track my order?").await?;
    println!("{}\n", run.output());
    println!("--- transcript ---\n{}\n", run.transcript().to_text());
    println!("--- usage: {:?}\n", run.usage());

    // Follow-up question on top of the first run's transcript.
    println!("=== follow-up ===");
    let history = run
        .transcript()
        .clone()
        .add(Message::user("And what if the tracking page shows nothing?"));
    let followup = agent.run(history).await?;
    println!("{}\n", followup.output());
    println!("--- usage: {:?}", followup.usage());

    Ok(())
}

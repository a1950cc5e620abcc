//! Structured agent whose instructions are derived from injected customer data.
//!
//! ```sh
//! cargo run --example dependencies
//! ```

use deskagent::agent::Agent;
use deskagent::models::OpenAiChat;
use deskagent::render::to_markdown;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize, JsonSchema)]
struct SupportReply {
    response: String,
    needs_escalation: bool,
    follow_up_required: bool,
    sentiment: String,
}

#[derive(Debug, Serialize)]
struct Order {
    order_id: String,
    status: String,
    items: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CustomerDetails {
    customer_id: String,
    name: String,
    email: String,
    orders: Option<Vec<Order>>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    dotenvy::dotenv().ok();

    let model = OpenAiChat::from_env("gpt-4o")?;
    let agent: Agent<SupportReply, CustomerDetails> = Agent::builder(model)
        .with_instructions("You are a customer support agent for an online store.")
        .with_instructions_fn(|customer: &CustomerDetails| {
            format!("Customer details:\n{}", to_markdown(customer))
        })
        .build();

    let customer = CustomerDetails {
        customer_id: "1".to_string(),
        name: "John Doe".to_string(),
        email: "john.doe@example.com".to_string(),
        orders: Some(vec![Order {
            order_id: "12345".to_string(),
            status: "shipped".to_string(),
            items: vec!["Blue Jeans".to_string(), "T-Shirt".to_string()],
        }]),
    };

    let run = agent
        .run_with("What did I order?", &customer)
        .await?;

    println!("--- transcript ---\n{}\n", run.transcript().to_text());

    let reply = run.output();
    println!("response:           {}", reply.response);
    println!("needs_escalation:   {}", reply.needs_escalation);
    println!("follow_up_required: {}", reply.follow_up_required);
    println!("sentiment:          {}", reply.sentiment);
    println!("usage:              {:?}", run.usage());

    Ok(())
}

//! Structured agent with a shipping lookup tool and validation retries.
//!
//! The tool reads the injected customer record from its context to find the
//! most recent order, then answers from a small in-memory shipping table.
//!
//! ```sh
//! cargo run --example tools
//! ```

use deskagent::agent::Agent;
use deskagent::models::OpenAiChat;
use deskagent::render::to_markdown;
use deskagent::tools::{FunctionTool, ToolOutcome};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
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

fn shipping_status(order_id: &str) -> Option<&'static str> {
    match order_id {
        "12345" => Some("Shipped on 2024-12-01"),
        "67890" => Some("Out for delivery"),
        _ => None,
    }
}

fn shipping_info_tool() -> FunctionTool {
    FunctionTool::new(
        "get_shipping_info",
        "Get the shipping status of the customer's most recent order",
        |_args, ctx| {
            let order_id = ctx
                .deps()
                .and_then(|deps| deps["orders"][0]["order_id"].as_str())
                .map(str::to_string);
            Box::pin(async move {
                let Some(order_id) = order_id else {
                    return ToolOutcome::error("customer has no orders on file");
                };
                match shipping_status(&order_id) {
                    Some(status) => ToolOutcome::success(json!({
                        "order_id": order_id,
                        "status": status,
                    })),
                    None => ToolOutcome::error(format!("no shipping record for order {order_id}")),
                }
            })
        },
    )
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
        .with_tool(shipping_info_tool())
        .with_retries(3)
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
        .run_with("Where is my last order?", &customer)
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

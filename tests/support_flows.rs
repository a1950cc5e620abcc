//! End-to-end agent wirings against a scripted model: the same shapes as the
//! demos under `demos/`, without a live provider.

use deskagent::agent::{Agent, ChatAgent};
use deskagent::errors::AgentError;
use deskagent::models::{Content, Message};
use deskagent::render::to_markdown;
use deskagent::testing::ScriptedModel;
use deskagent::tools::{FunctionTool, ToolCall, ToolOutcome};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize, JsonSchema, PartialEq)]
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

fn sample_customer() -> CustomerDetails {
    CustomerDetails {
        customer_id: "1".to_string(),
        name: "John Doe".to_string(),
        email: "john.doe@example.com".to_string(),
        orders: Some(vec![Order {
            order_id: "12345".to_string(),
            status: "shipped".to_string(),
            items: vec!["Blue Jeans".to_string(), "T-Shirt".to_string()],
        }]),
    }
}

fn sample_reply() -> serde_json::Value {
    json!({
        "response": "Your order shipped on 2024-12-01.",
        "needs_escalation": false,
        "follow_up_required": false,
        "sentiment": "neutral"
    })
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
                match order_id.as_deref() {
                    Some("12345") => ToolOutcome::success(json!("Shipped on 2024-12-01")),
                    Some("67890") => ToolOutcome::success(json!("Out for delivery")),
                    Some(other) => {
                        ToolOutcome::error(format!("no shipping record for order {other}"))
                    }
                    None => ToolOutcome::error("customer has no orders on file"),
                }
            })
        },
    )
}

#[tokio::test]
async fn free_text_agent_with_follow_up_history() {
    let model = ScriptedModel::with_completions(
        "scripted",
        [
            ScriptedModel::text_completion("You can track it on the orders page."),
            ScriptedModel::text_completion("Then contact support with your order number."),
        ],
    );

    let agent = ChatAgent::builder(model.clone())
        .with_instructions("You are a customer support agent for an online store.")
        .build();

    let first = agent.run("How can I track my order?").await.expect("first run");
    assert_eq!(first.output(), "You can track it on the orders page.");
    assert_eq!(first.usage().total_tokens(), 15);

    let history = first
        .transcript()
        .clone()
        .add(Message::user("What if the page shows nothing?"));
    let second = agent.run(history).await.expect("second run");

    assert_eq!(second.output(), "Then contact support with your order number.");
    // The second request carried the whole first exchange.
    let second_request = &model.calls()[1];
    assert_eq!(second_request.messages().len(), 3);
    assert_eq!(
        second_request.system(),
        Some("You are a customer support agent for an online store.")
    );
}

#[tokio::test]
async fn structured_agent_parses_support_reply() {
    let model = ScriptedModel::with_completions(
        "scripted",
        [ScriptedModel::structured_completion(&sample_reply())],
    );

    let agent: Agent<SupportReply> = Agent::builder(model.clone())
        .with_instructions("You are a customer support agent for an online store.")
        .build();

    let run = agent.run("Where is my order?").await.expect("run");
    assert_eq!(run.output().sentiment, "neutral");
    assert!(!run.output().needs_escalation);

    // The schema travels in the system text.
    let calls = model.calls();
    let system = calls[0].system().expect("system text");
    assert!(system.contains("needs_escalation"));
    assert!(system.contains("sentiment"));
}

#[tokio::test]
async fn dependencies_shape_the_instructions() {
    let model = ScriptedModel::with_completions(
        "scripted",
        [ScriptedModel::structured_completion(&sample_reply())],
    );

    let agent: Agent<SupportReply, CustomerDetails> = Agent::builder(model.clone())
        .with_instructions("You are a customer support agent for an online store.")
        .with_instructions_fn(|customer: &CustomerDetails| {
            format!("Customer details:\n{}", to_markdown(customer))
        })
        .build();

    agent
        .run_with("What did I order?", &sample_customer())
        .await
        .expect("run");

    let calls = model.calls();
    let system = calls[0].system().expect("system text");
    assert!(system.contains("Customer details:"));
    assert!(system.contains("- **name**: John Doe"));
    assert!(system.contains("- **order_id**: 12345"));
}

#[tokio::test]
async fn tool_call_flows_through_to_the_final_reply() {
    let model = ScriptedModel::with_completions(
        "scripted",
        [
            ScriptedModel::content_completion(Content::from(vec![ToolCall::new(
                "call-1",
                "get_shipping_info",
                json!({}),
            )])),
            ScriptedModel::structured_completion(&sample_reply()),
        ],
    );

    let agent: Agent<SupportReply, CustomerDetails> = Agent::builder(model.clone())
        .with_instructions("You are a customer support agent for an online store.")
        .with_instructions_fn(|customer: &CustomerDetails| {
            format!("Customer details:\n{}", to_markdown(customer))
        })
        .with_tool(shipping_info_tool())
        .with_retries(3)
        .build();

    let run = agent
        .run_with("Where is my last order?", &sample_customer())
        .await
        .expect("run");

    assert_eq!(run.output().response, "Your order shipped on 2024-12-01.");
    // Two model turns: tool call, then the final structured reply.
    assert_eq!(model.call_count(), 2);
    // Usage sums across both turns.
    assert_eq!(run.usage().total_tokens(), 30);

    // The second request includes the tool call and its reply.
    let second_request = &model.calls()[1];
    let roles: Vec<String> = second_request
        .messages()
        .iter()
        .map(|m| m.role().to_string())
        .collect();
    assert_eq!(roles, vec!["User", "Assistant", "Tool"]);
}

#[tokio::test]
async fn malformed_replies_consume_the_retry_budget() {
    let model = ScriptedModel::with_completions(
        "scripted",
        [
            ScriptedModel::text_completion("let me think about that"),
            ScriptedModel::text_completion("{\"response\": \"truncated\""),
            ScriptedModel::structured_completion(&sample_reply()),
        ],
    );

    let agent: Agent<SupportReply> = Agent::builder(model.clone()).with_retries(3).build();

    let run = agent.run("Where is my order?").await.expect("recovers");
    assert_eq!(run.output().response, "Your order shipped on 2024-12-01.");
    assert_eq!(model.call_count(), 3);

    // The retry prompt tells the model what went wrong.
    let retry_request = &model.calls()[1];
    let last = retry_request.messages().last().expect("retry message");
    assert!(last
        .content()
        .first_text()
        .expect("text")
        .contains("could not be accepted"));
}

#[tokio::test]
async fn retry_budget_exhaustion_rejects_the_output() {
    let bad_replies = (0..4).map(|i| ScriptedModel::text_completion(format!("nope {i}")));
    let model = ScriptedModel::with_completions("scripted", bad_replies);

    let agent: Agent<SupportReply> = Agent::builder(model.clone()).with_retries(3).build();

    let err = agent.run("Where is my order?").await.expect_err("rejected");
    match err {
        AgentError::OutputRejected { attempts, .. } => assert_eq!(attempts, 4),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(model.call_count(), 4);
}

#[tokio::test]
async fn calling_an_unregistered_tool_fails() {
    let model = ScriptedModel::with_completions(
        "scripted",
        [ScriptedModel::content_completion(Content::from(vec![
            ToolCall::new("call-1", "get_refund_status", json!({})),
        ]))],
    );

    let agent: Agent<SupportReply, CustomerDetails> = Agent::builder(model)
        .with_tool(shipping_info_tool())
        .build();

    let err = agent
        .run_with("Where is my refund?", &sample_customer())
        .await
        .expect_err("unknown tool");
    assert!(matches!(
        err,
        AgentError::ToolNotFound { tool_name } if tool_name == "get_refund_status"
    ));
}

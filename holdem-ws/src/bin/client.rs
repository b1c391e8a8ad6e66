use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Minimal terminal client for manual play:
/// `client [ws://host:port/ws] [name]`, then type commands on stdin.
#[tokio::main]
async fn main() {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ws://127.0.0.1:8080/ws".to_string());
    let name = std::env::args().nth(2).unwrap_or_else(|| "guest".to_string());

    let (ws, _resp) = connect_async(url.as_str()).await.expect("connect");
    let (mut ws_tx, mut ws_rx) = ws.split();

    ws_tx
        .send(Message::Text(
            json!({"type": "join", "name": name}).to_string(),
        ))
        .await
        .expect("join");

    let input = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let Some(msg) = parse_command(line.trim()) else {
                println!("commands: start | stack N | fold | check | call | raise N");
                continue;
            };
            if ws_tx.send(Message::Text(msg.to_string())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_rx.next().await {
        let Message::Text(text) = msg else { continue };
        match serde_json::from_str::<Value>(&text) {
            Ok(event) => print_event(&event),
            Err(_) => println!("<- {}", text),
        }
    }
    input.abort();
}

fn parse_command(line: &str) -> Option<Value> {
    let mut parts = line.split_whitespace();
    let cmd = parts.next()?;
    let arg = parts.next();
    match (cmd, arg) {
        ("start", None) => Some(json!({"type": "startGame"})),
        ("stack", Some(n)) => Some(json!({
            "type": "setStartingStack",
            "amount": n.parse::<u64>().ok()?
        })),
        ("fold", None) => Some(json!({"type": "action", "action": "fold"})),
        ("check", None) => Some(json!({"type": "action", "action": "check"})),
        ("call", None) => Some(json!({"type": "action", "action": "call"})),
        ("raise", Some(n)) => Some(json!({
            "type": "action",
            "action": "raise",
            "amount": n.parse::<u64>().ok()?
        })),
        _ => None,
    }
}

fn print_event(event: &Value) {
    match event.get("type").and_then(Value::as_str) {
        Some("errorMessage") => {
            println!("!! {}", event["message"].as_str().unwrap_or("error"));
        }
        Some("state") => {
            let cards = |key: &str| {
                event[key]
                    .as_array()
                    .map(|a| {
                        a.iter()
                            .filter_map(Value::as_str)
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .unwrap_or_default()
            };
            println!(
                "[{}] pot {} board [{}] you [{}] turn {}",
                event["phase"].as_str().unwrap_or("?"),
                event["pot"].as_u64().unwrap_or(0),
                cards("communityCards"),
                cards("yourCards"),
                event["currentTurnId"].as_str().unwrap_or("-"),
            );
            if let Some(logs) = event["logs"].as_array() {
                if let Some(last) = logs.last() {
                    println!("   {}", last["message"].as_str().unwrap_or(""));
                }
            }
            if event["canAct"].as_bool() == Some(true) {
                println!("   your move: {}", event["availableActions"]);
            }
            if let Some(insight) = event.get("handInsight").filter(|v| !v.is_null()) {
                println!(
                    "   {} ({} {})",
                    insight["currentHand"].as_str().unwrap_or(""),
                    insight["strengthScore"],
                    insight["strengthLabel"].as_str().unwrap_or(""),
                );
            }
        }
        _ => println!("<- {}", event),
    }
}

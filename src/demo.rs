// Demo mode - scripted content for the example dashboards
//
// Generates a realistic-looking conversation for the feed view: text and
// markdown messages, file payloads exercising each rendering strategy, a
// token-by-token streamed reply, and a reaction. The gallery items are a
// plain markdown list.
//
// Run with: cargo run --release

use crate::widgets::chat::content::{FileInput, Value};
use bytes::Bytes;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep, Duration};

/// Events the demo script sends into the TUI
#[derive(Debug)]
pub enum DemoEvent {
    /// Append a new message to the feed
    Post {
        user: String,
        value: Value,
        avatar: Option<String>,
    },
    /// Stream a token into the newest message
    Stream(String),
    /// Toggle a reaction on the newest message
    React(String),
}

/// Minimal valid 1x1 PNG, enough for the sniffer and the image strategy
const TINY_PNG: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, b'I', b'H', b'D',
    b'R', 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0a, b'I', b'D', b'A', b'T', 0x78, 0x9c, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, b'I',
    b'E', b'N', b'D', 0xae, 0x42, 0x60, 0x82,
];

const SCORES_CSV: &[u8] = b"name,language,score\nAda,Rust,10\nGrace,COBOL,9\nEdsger,ALGOL,8\n";

/// Items for the gallery dashboard: 32 markdown snippets
pub fn gallery_items() -> Vec<String> {
    (1..=32)
        .map(|i| format!("**Item {i}**: sample content for item {i}"))
        .collect()
}

/// Drive the scripted conversation until it ends or shutdown is signalled.
pub async fn run_demo(tx: mpsc::Sender<DemoEvent>, mut shutdown_rx: oneshot::Receiver<()>) {
    // Initial delay to let the TUI render its first frame
    sleep(Duration::from_millis(600)).await;

    for (event, delay_ms) in scripted_sequence() {
        if shutdown_rx.try_recv().is_ok() {
            return;
        }
        if tx.send(event).await.is_err() {
            return;
        }
        sleep(Duration::from_millis(delay_ms)).await;
    }

    // Stream the final reply word by word
    let reply = "Those scores line up with what the table showed: the early \
                 language designers still hold the podium. I can re-rank by \
                 decade if you want a fairer comparison.";
    for word in reply.split_inclusive(' ') {
        if shutdown_rx.try_recv().is_ok() {
            return;
        }
        if tx.send(DemoEvent::Stream(word.to_string())).await.is_err() {
            return;
        }
        sleep(Duration::from_millis(45)).await;
    }

    let _ = tx.send(DemoEvent::React("favorite".to_string())).await;

    // Keep the channel alive so the TUI keeps running, but honor shutdown
    let _ = (&mut shutdown_rx).await;
}

fn post(user: &str, value: impl Into<Value>) -> DemoEvent {
    DemoEvent::Post {
        user: user.to_string(),
        value: value.into(),
        avatar: None,
    }
}

fn scripted_sequence() -> Vec<(DemoEvent, u64)> {
    vec![
        (
            post("User", "Morning! Can you pull up the language survey results?"),
            900,
        ),
        (
            post(
                "Assistant",
                "Sure. Quick summary first:\n\n\
                 - **32 responses** came in\n\
                 - *Rust* leads for the `systems` category\n\
                 - Full table below\n\n\
                 > Numbers are self-reported, take them with a grain of salt.",
            ),
            1200,
        ),
        (
            post(
                "Assistant",
                Value::File(FileInput::new(
                    Bytes::from_static(SCORES_CSV),
                    "scores.csv",
                    "text/csv",
                )),
            ),
            1200,
        ),
        (
            post(
                "User",
                Value::File(FileInput::new(
                    Bytes::from_static(TINY_PNG),
                    "chart.png",
                    "image/png",
                )),
            ),
            1000,
        ),
        (
            post(
                "System",
                Value::File(FileInput::new(
                    Bytes::from_static(b"{\"survey\":\"2026-q3\",\"n\":32}"),
                    "meta.json",
                    "application/json",
                )),
            ),
            900,
        ),
        // The streamed reply starts empty and grows token by token
        (post("Assistant", ""), 300),
    ]
}

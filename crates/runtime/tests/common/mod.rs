#![allow(dead_code)]

use std::time::Duration;

use janggi_runtime::Event;
use tokio::sync::broadcast::{self, error::RecvError};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Waits for the first event `pick` accepts, skipping everything before it.
pub async fn wait_for<T>(
    rx: &mut broadcast::Receiver<Event>,
    mut pick: impl FnMut(Event) -> Option<T>,
) -> T {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Some(found) = pick(event) {
                        return found;
                    }
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => panic!("event bus closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

pub const OPENING_SECOND_TO_MOVE: &str = r#"{
    "position": [
        ["bR","bH","bE","bA","bG","bA","bE","bH","bR"],
        ["","","","","","","","",""],
        ["","bC","","","","","","bC",""],
        ["bP","","bP","","bP","","bP","","bP"],
        ["","","","","","","","",""],
        ["rP","","","","","","","",""],
        ["","","rP","","rP","","rP","","rP"],
        ["","rC","","","","","","rC",""],
        ["","","","","","","","",""],
        ["rR","rH","rE","rA","rG","rA","rE","rH","rR"]
    ],
    "turn": "b",
    "red_drops": [],
    "black_drops": ["bH"],
    "previous": [[5,0],[6,0]]
}"#;

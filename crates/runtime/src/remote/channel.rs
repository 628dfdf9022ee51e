use async_trait::async_trait;
use tokio::sync::mpsc;

use janggi_core::MoveIntent;

use super::{MoveNotifier, NotifyError};

/// Forwards intents into an in-process channel.
#[derive(Clone, Debug)]
pub struct ChannelNotifier {
    tx: mpsc::Sender<MoveIntent>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::Sender<MoveIntent>) -> Self {
        Self { tx }
    }

    /// Notifier plus the receiving end of its channel.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<MoveIntent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl MoveNotifier for ChannelNotifier {
    async fn notify(&self, intent: MoveIntent) -> Result<(), NotifyError> {
        self.tx
            .send(intent)
            .await
            .map_err(|_| NotifyError::ChannelClosed)
    }
}

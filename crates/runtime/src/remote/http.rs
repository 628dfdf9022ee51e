//! HTTP notifier posting move intents to `{api_host}/moves`.

use async_trait::async_trait;
use tracing::debug;

use janggi_core::MoveIntent;

use super::{MoveNotifier, NotifyError};

#[derive(Clone, Debug)]
pub struct HttpNotifier {
    client: reqwest::Client,
    moves_url: String,
}

impl HttpNotifier {
    pub fn new(api_host: &str) -> Self {
        Self::with_client(reqwest::Client::new(), api_host)
    }

    pub fn with_client(client: reqwest::Client, api_host: &str) -> Self {
        Self {
            client,
            moves_url: format!("{}/moves", api_host.trim_end_matches('/')),
        }
    }

    pub fn moves_url(&self) -> &str {
        &self.moves_url
    }
}

#[async_trait]
impl MoveNotifier for HttpNotifier {
    async fn notify(&self, intent: MoveIntent) -> Result<(), NotifyError> {
        let response = self.client.post(&self.moves_url).json(&intent).send().await?;
        let status = response.status();
        debug!(%status, url = %self.moves_url, "move intent posted");
        response.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_endpoint_is_joined_once() {
        assert_eq!(
            HttpNotifier::new("http://localhost:4000/").moves_url(),
            "http://localhost:4000/moves"
        );
        assert_eq!(
            HttpNotifier::new("http://localhost:4000").moves_url(),
            "http://localhost:4000/moves"
        );
    }
}

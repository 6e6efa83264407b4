//! Webhook notifications for available usernames.
//!
//! Delivery is best effort. Failures are written to the error log and
//! reported back as [`NotifyOutcome::Failed`], never as an error.

use crate::error_log::ErrorLog;
use crate::transport::Transport;
use crate::types::NotifyOutcome;
use serde::Serialize;
use std::sync::Arc;

/// Body of the webhook POST.
#[derive(Debug, Serialize)]
struct WebhookMessage {
    content: String,
}

/// Text sent to the webhook for an available username.
pub fn availability_message(username: &str) -> String {
    format!("The username '{}' is available! @everyone", username)
}

pub struct Notifier {
    webhook_url: Option<String>,
    transport: Arc<dyn Transport>,
    error_log: ErrorLog,
}

impl Notifier {
    /// `webhook_url` of `None` (or empty) turns notifications off.
    pub fn new(
        webhook_url: Option<String>,
        transport: Arc<dyn Transport>,
        error_log: ErrorLog,
    ) -> Self {
        let webhook_url = webhook_url.filter(|url| !url.trim().is_empty());
        Self {
            webhook_url,
            transport,
            error_log,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Announce that `username` is available.
    pub async fn notify_available(&self, username: &str) -> NotifyOutcome {
        let Some(url) = self.webhook_url.as_deref() else {
            return NotifyOutcome::Skipped;
        };

        let message = WebhookMessage {
            content: availability_message(username),
        };
        let payload = match serde_json::to_value(&message) {
            Ok(payload) => payload,
            Err(e) => return self.fail(format!("Webhook error for '{}': {}", username, e)),
        };

        match self.transport.post_json(url, &payload).await {
            Ok(response) if response.status == 204 => {
                tracing::info!(username, "webhook delivered");
                NotifyOutcome::Sent
            }
            Ok(response) => self.fail(format!(
                "Failed to send webhook for '{}'. HTTP {}: {}",
                username, response.status, response.body
            )),
            Err(e) => self.fail(format!("Webhook error for '{}': {}", username, e)),
        }
    }

    fn fail(&self, reason: String) -> NotifyOutcome {
        tracing::warn!("{}", reason);
        self.error_log.record(&reason);
        NotifyOutcome::Failed { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UsernameCheckError;
    use crate::transport::HttpResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Answers every POST with a fixed result and remembers what was sent.
    struct FixedTransport {
        reply: Result<HttpResponse, UsernameCheckError>,
        posts: Mutex<Vec<(String, serde_json::Value)>>,
    }

    impl FixedTransport {
        fn new(reply: Result<HttpResponse, UsernameCheckError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                posts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn get(&self, _url: &str) -> Result<HttpResponse, UsernameCheckError> {
            Err(UsernameCheckError::internal("GET not expected"))
        }

        async fn post_json(
            &self,
            url: &str,
            payload: &serde_json::Value,
        ) -> Result<HttpResponse, UsernameCheckError> {
            self.posts
                .lock()
                .unwrap()
                .push((url.to_string(), payload.clone()));
            self.reply.clone()
        }
    }

    #[tokio::test]
    async fn test_empty_url_is_skipped() {
        let dir = TempDir::new().unwrap();
        let transport = FixedTransport::new(Ok(HttpResponse::new(204, "")));
        let log = ErrorLog::new(dir.path().join("errors.txt"));
        let notifier = Notifier::new(Some(String::new()), transport.clone(), log.clone());

        assert!(!notifier.is_enabled());
        assert_eq!(notifier.notify_available("alice").await, NotifyOutcome::Skipped);
        assert!(transport.posts.lock().unwrap().is_empty());
        assert!(!log.path().exists());
    }

    #[tokio::test]
    async fn test_204_is_success_and_payload_has_content() {
        let dir = TempDir::new().unwrap();
        let transport = FixedTransport::new(Ok(HttpResponse::new(204, "")));
        let notifier = Notifier::new(
            Some("https://hooks.example.com/a".to_string()),
            transport.clone(),
            ErrorLog::new(dir.path().join("errors.txt")),
        );

        assert_eq!(notifier.notify_available("alice").await, NotifyOutcome::Sent);

        let posts = transport.posts.lock().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].0, "https://hooks.example.com/a");
        assert_eq!(
            posts[0].1["content"],
            "The username 'alice' is available! @everyone"
        );
    }

    #[tokio::test]
    async fn test_non_204_is_logged_and_swallowed() {
        let dir = TempDir::new().unwrap();
        let log = ErrorLog::new(dir.path().join("errors.txt"));
        let transport = FixedTransport::new(Ok(HttpResponse::new(400, "bad payload")));
        let notifier = Notifier::new(
            Some("https://hooks.example.com/a".to_string()),
            transport,
            log.clone(),
        );

        let outcome = notifier.notify_available("bob").await;
        assert!(matches!(outcome, NotifyOutcome::Failed { .. }));

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert!(content.contains("Failed to send webhook for 'bob'. HTTP 400: bad payload"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_logged_and_swallowed() {
        let dir = TempDir::new().unwrap();
        let log = ErrorLog::new(dir.path().join("errors.txt"));
        let transport = FixedTransport::new(Err(UsernameCheckError::network("refused")));
        let notifier = Notifier::new(
            Some("https://hooks.example.com/a".to_string()),
            transport,
            log.clone(),
        );

        let outcome = notifier.notify_available("carol").await;
        assert!(matches!(outcome, NotifyOutcome::Failed { .. }));
        assert!(std::fs::read_to_string(log.path())
            .unwrap()
            .contains("Webhook error for 'carol'"));
    }
}

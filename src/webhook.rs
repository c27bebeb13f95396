use tracing::{error, info};

use crate::error::WebhookError;
use crate::model::Notification;

/// Discord webhook client that mirrors notifications into a team channel.
#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    hook_url: String,
}

impl DiscordWebhook {
    pub fn new(hook_url: String) -> Self {
        Self { hook_url }
    }

    /// Message body for a notification: bold title, then the description.
    pub fn content(notification: &Notification) -> String {
        format!("**{}**\n{}", notification.title, notification.description)
    }

    /// Post a notification. Blocking; call from `spawn_blocking` inside async code.
    pub fn post(&self, notification: &Notification) -> Result<(), WebhookError> {
        let payload = serde_json::json!({ "content": Self::content(notification) });
        match ureq::post(&self.hook_url).send_json(payload) {
            Ok(resp) => {
                info!(status = resp.status().as_u16(), "Posted notification to Discord webhook");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to post to Discord webhook");
                Err(e.into())
            }
        }
    }
}

/// Push notification delivery.
///
/// Notifications go out through Pushover's message API as a form-encoded
/// POST carrying the application token, the recipient's user key and the
/// text. Any non-success status is surfaced as `MonitorError::Connectivity`
/// with the response body attached; nothing is retried.

use tracing::info;

use crate::model::MonitorError;

pub const PUSH_URL: &str = "https://api.pushover.net:443/1/messages.json";

/// Anything that can deliver a text notification.
pub trait Notifier {
    fn send(&self, message: &str) -> Result<(), MonitorError>;

    /// Channel name for logs.
    fn channel_name(&self) -> &str;
}

impl<T: Notifier + ?Sized> Notifier for std::rc::Rc<T> {
    fn send(&self, message: &str) -> Result<(), MonitorError> {
        (**self).send(message)
    }

    fn channel_name(&self) -> &str {
        (**self).channel_name()
    }
}

/// Pushover message API client.
pub struct PushoverNotifier {
    api_key: String,
    user_key: String,
    url: String,
    client: reqwest::blocking::Client,
}

impl PushoverNotifier {
    pub fn new(api_key: &str, user_key: &str) -> Self {
        Self::with_url(api_key, user_key, PUSH_URL)
    }

    pub fn with_url(api_key: &str, user_key: &str, url: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            user_key: user_key.to_string(),
            url: url.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn form<'a>(&'a self, message: &'a str) -> [(&'static str, &'a str); 3] {
        [
            ("token", self.api_key.as_str()),
            ("user", self.user_key.as_str()),
            ("message", message),
        ]
    }
}

impl Notifier for PushoverNotifier {
    fn send(&self, message: &str) -> Result<(), MonitorError> {
        // `.form` sets Content-Type: application/x-www-form-urlencoded
        let response = self.client.post(&self.url).form(&self.form(message)).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::Connectivity {
                endpoint: "push service",
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        info!(
            channel = self.channel_name(),
            chars = message.chars().count(),
            "push notification delivered"
        );
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "pushover"
    }
}

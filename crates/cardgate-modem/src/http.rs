//! Minimal HTTP/1.1 request framing for the notification webhook.
//!
//! The modem forwards the request bytes verbatim over its TCP socket, so the
//! framing here is byte-exact and nothing more: one `POST`, a JSON body and
//! the three headers the collector expects.

use std::fmt;

use cardgate_core::constants::{NOTIFICATION_CONTENT_TYPE, NOTIFICATION_JSON_KEY};
use cardgate_core::NotificationMessage;

/// A `POST` request carrying a JSON body.
///
/// # Examples
///
/// ```
/// use cardgate_modem::HttpRequest;
///
/// let request = HttpRequest::post("maker.ifttt.com", "/trigger/x")
///     .json_body("{\"default\":\"hi\"}");
///
/// let text = request.to_string();
/// assert!(text.starts_with("POST /trigger/x HTTP/1.1\r\nHost: maker.ifttt.com\r\n"));
/// assert!(text.ends_with("Content-Length: 16\r\n\r\n{\"default\":\"hi\"}"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    host: String,
    path: String,
    body: String,
}

impl HttpRequest {
    /// Start a `POST` to `path` on `host` with an empty body.
    pub fn post(host: impl Into<String>, path: impl Into<String>) -> Self {
        HttpRequest {
            host: host.into(),
            path: path.into(),
            body: String::new(),
        }
    }

    /// Set the JSON body.
    #[must_use]
    pub fn json_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Build the webhook request for an access notification.
    pub fn notification(host: &str, path: &str, message: &NotificationMessage) -> Self {
        Self::post(host, path).json_body(notification_body(&message.text))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Byte length announced in `Content-Length`.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }
}

impl fmt::Display for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "POST {} HTTP/1.1\r\nHost: {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n\r\n{}",
            self.path,
            self.host,
            NOTIFICATION_CONTENT_TYPE,
            self.content_length(),
            self.body
        )
    }
}

/// JSON object with the notification text under the collector's key.
///
/// The text is escaped by `serde_json`, so names containing quotes or
/// backslashes still produce a valid document.
pub fn notification_body(text: &str) -> String {
    format!(
        "{{\"{NOTIFICATION_JSON_KEY}\": {}}}",
        serde_json::Value::from(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_body_shape() {
        assert_eq!(
            notification_body("User Accessed: Admin at 1500"),
            "{\"default\": \"User Accessed: Admin at 1500\"}"
        );
    }

    #[test]
    fn test_notification_body_escapes_quotes() {
        let body = notification_body("User Accessed: Jo \"JJ\" at 1");
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["default"], "User Accessed: Jo \"JJ\" at 1");
    }

    #[test]
    fn test_full_request_bytes() {
        let message = NotificationMessage {
            text: "User Accessed: Master at 7".to_string(),
            uptime_millis: 7,
        };
        let request = HttpRequest::notification("example.net", "/hook", &message);
        let body = "{\"default\": \"User Accessed: Master at 7\"}";

        assert_eq!(
            request.to_string(),
            format!(
                "POST /hook HTTP/1.1\r\nHost: example.net\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
                body.len()
            )
        );
        assert_eq!(request.host(), "example.net");
        assert_eq!(request.path(), "/hook");
    }

    #[test]
    fn test_content_length_counts_bytes_not_chars() {
        let request = HttpRequest::post("h", "/").json_body("\"é\"");
        assert_eq!(request.content_length(), 4);
        assert!(request.to_string().contains("Content-Length: 4\r\n"));
    }
}

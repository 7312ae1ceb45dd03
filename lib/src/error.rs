use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationMonitorError {
    pub cause: String,
    pub message: Option<String>,
}

impl NotificationMonitorError {
    pub fn new(
        cause: &str,
        message: &str,
    ) -> Self {
        Self {
            cause: cause.to_string(),
            message: Some(message.to_string()),
        }
    }

    pub fn message_or(
        &self,
        fallback: &str,
    ) -> String {
        self.message.clone().unwrap_or(fallback.to_string())
    }
}

impl std::error::Error for NotificationMonitorError {}

impl fmt::Display for NotificationMonitorError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.cause)
    }
}

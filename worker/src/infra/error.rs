use std::fmt;

#[derive(Debug)]
pub struct AppError {
    pub cause: String,
    pub message: Option<String>,
}

impl AppError {
    pub fn new(
        cause: &str,
        message: &str,
    ) -> Self {
        Self {
            cause: cause.to_string(),
            message: Some(message.to_string()),
        }
    }
}

impl std::error::Error for AppError {}

impl fmt::Display for AppError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{} - Cause: {}", message, self.cause),
            None => write!(f, "{}", self.cause),
        }
    }
}

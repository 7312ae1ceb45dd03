use crate::aws::SqsClient;
use crate::error::NotificationMonitorError;
use aws_sdk_sqs::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_sqs::types::MessageSystemAttributeName;
use std::future::Future;
use tracing::{debug, instrument, warn};

pub const MAX_MESSAGES_PER_BATCH: i32 = 10;
pub const WAIT_TIME_IN_SECONDS: i32 = 0;
pub const VISIBILITY_TIMEOUT_IN_SECONDS: i32 = 10;

/// One message pulled from the queue, body untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEnvelope {
    pub message_id: String,
    pub body: String,
    pub sent_timestamp: Option<String>,
}

impl RawEnvelope {
    pub fn new(
        message_id: &str,
        body: &str,
    ) -> Self {
        Self {
            message_id: message_id.to_string(),
            body: body.to_string(),
            sent_timestamp: None,
        }
    }
}

pub trait QueueProvider {
    /// One round-trip to the queue. Never acknowledges what it receives.
    fn fetch_batch(
        &self,
        queue_url: &str,
    ) -> impl Future<Output = Result<Vec<RawEnvelope>, NotificationMonitorError>> + Send;
}

#[derive(Clone, Debug)]
pub struct SqsQueueProvider {
    sqs_client: SqsClient,
}

impl SqsQueueProvider {
    pub fn new(sqs_client: SqsClient) -> Self {
        Self { sqs_client }
    }
}

impl QueueProvider for SqsQueueProvider {
    #[instrument(skip_all, name = "receive_from_sqs", fields(queue_url = %queue_url))]
    async fn fetch_batch(
        &self,
        queue_url: &str,
    ) -> Result<Vec<RawEnvelope>, NotificationMonitorError> {
        let output = self
            .sqs_client
            .client
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(MAX_MESSAGES_PER_BATCH)
            .wait_time_seconds(WAIT_TIME_IN_SECONDS)
            .visibility_timeout(VISIBILITY_TIMEOUT_IN_SECONDS)
            .message_system_attribute_names(MessageSystemAttributeName::SentTimestamp)
            .message_attribute_names("All")
            .send()
            .await
            .map_err(|error| {
                NotificationMonitorError::new(
                    &DisplayErrorContext(&error).to_string(),
                    error.message().unwrap_or("Failed to receive sqs messages"),
                )
            })?;

        let messages = output.messages.unwrap_or_default();
        debug!(received = messages.len(), "Received sqs messages");

        let mut envelopes = Vec::with_capacity(messages.len());
        for message in messages {
            let sent_timestamp = message.attributes.as_ref().and_then(|attributes| attributes.get(&MessageSystemAttributeName::SentTimestamp).cloned());

            match (message.message_id, message.body) {
                (Some(message_id), Some(body)) => envelopes.push(RawEnvelope {
                    message_id,
                    body,
                    sent_timestamp,
                }),
                (message_id, _) => {
                    warn!(message_id = ?message_id, "Skipping sqs message without id or body");
                },
            }
        }

        Ok(envelopes)
    }
}

use crate::notification::{
    BounceRecord, DeliveryRecord, MailSummary, NotificationRecord, NotificationType, SesBounce, SesDelivery, SesMail, SesMessage, SqsBody, SENTINEL,
};
use crate::queue::RawEnvelope;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::str::FromStr;
use tracing::debug;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Turns SQS envelopes carrying SES notifications into [`NotificationRecord`]s.
///
/// Anything that cannot be turned into a record (bad JSON, missing `Message` or `mail`,
/// unsupported notification type) yields `None`. Missing optional fields fall back to
/// [`SENTINEL`].
pub struct Normalizer;

impl Normalizer {
    pub fn normalize(envelope: &RawEnvelope) -> Option<NotificationRecord> {
        let record = Self::normalize_sent_body(&envelope.body, envelope.sent_timestamp.as_deref());
        if record.is_none() {
            debug!(message_id = %envelope.message_id, "Skipping envelope without a supported notification");
        }
        record
    }

    pub fn normalize_body(body: &str) -> Option<NotificationRecord> {
        Self::normalize_sent_body(body, None)
    }

    /// `sent_timestamp` is the queue's `SentTimestamp` attribute (epoch millis), used
    /// when the mail carries no readable timestamp of its own.
    pub fn normalize_sent_body(
        body: &str,
        sent_timestamp: Option<&str>,
    ) -> Option<NotificationRecord> {
        let sqs_body = serde_json::from_str::<SqsBody>(body)
            .map_err(|error| debug!("Failed to parse sqs body: {error}"))
            .ok()?;

        let message = serde_json::from_str::<SesMessage>(&sqs_body.message?)
            .map_err(|error| debug!("Failed to parse ses message: {error}"))
            .ok()?;

        Self::from_ses_message(message, sent_timestamp)
    }

    pub fn from_ses_message(
        message: SesMessage,
        sent_timestamp: Option<&str>,
    ) -> Option<NotificationRecord> {
        let notification_type = NotificationType::from_str(&message.notification_type).ok()?;
        let mail = Self::summarize(message.mail?, sent_timestamp)?;

        let record = match notification_type {
            NotificationType::Delivery => NotificationRecord::Delivery(Self::delivery(mail, message.delivery)),
            NotificationType::Bounce => NotificationRecord::Bounce(Self::bounce(mail, message.bounce)),
        };

        Some(record)
    }

    fn summarize(
        mail: SesMail,
        sent_timestamp: Option<&str>,
    ) -> Option<MailSummary> {
        let timestamp = mail
            .timestamp
            .as_deref()
            .and_then(format_timestamp)
            .or_else(|| sent_timestamp.and_then(format_sent_timestamp))?;

        let subject = match mail.headers {
            None => SENTINEL.to_string(),
            Some(headers) => headers
                .into_iter()
                .rev()
                .find(|header| header.name == "Subject")
                .map(|header| header.value)
                .unwrap_or(SENTINEL.to_string()),
        };

        Some(MailSummary {
            timestamp,
            to: mail.destination.join(";"),
            subject,
        })
    }

    fn delivery(
        mail: MailSummary,
        delivery: Option<SesDelivery>,
    ) -> DeliveryRecord {
        DeliveryRecord {
            mail,
            smtp_response: delivery.and_then(|it| it.smtp_response),
        }
    }

    fn bounce(
        mail: MailSummary,
        bounce: Option<SesBounce>,
    ) -> BounceRecord {
        let bounce = bounce.unwrap_or_default();
        let first_recipient = bounce.bounced_recipients.first();

        let or_sentinel = |value: Option<&String>| value.cloned().unwrap_or(SENTINEL.to_string());

        BounceRecord {
            mail,
            reason: or_sentinel(bounce.bounce_sub_type.as_ref()),
            action: or_sentinel(first_recipient.and_then(|it| it.action.as_ref())),
            diagnostic_code: or_sentinel(first_recipient.and_then(|it| it.diagnostic_code.as_ref())),
            status: or_sentinel(first_recipient.and_then(|it| it.status.as_ref())),
            bounce,
        }
    }
}

/// Renders an SES mail timestamp as `YYYY-MM-DD HH:MM:SS` in UTC. Timestamps
/// without an offset are read as UTC.
pub fn format_timestamp(raw: &str) -> Option<String> {
    let raw = raw.trim();

    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|it| it.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|it| it.and_utc()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|it| it.and_utc()));

    match parsed {
        Ok(timestamp) => Some(timestamp.format(TIMESTAMP_FORMAT).to_string()),
        Err(error) => {
            debug!("Failed to parse mail timestamp {raw}: {error}");
            None
        },
    }
}

/// Same rendering for an SQS `SentTimestamp` (milliseconds since the epoch).
pub fn format_sent_timestamp(millis: &str) -> Option<String> {
    let timestamp = millis.trim().parse::<i64>().ok().and_then(DateTime::from_timestamp_millis);

    if timestamp.is_none() {
        debug!("Failed to parse sent timestamp {millis}");
    }

    timestamp.map(|it| it.format(TIMESTAMP_FORMAT).to_string())
}

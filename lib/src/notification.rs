use crate::error::NotificationMonitorError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Placeholder for any upstream field SES did not send.
pub const SENTINEL: &str = "n/a";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationType {
    Delivery,
    Bounce,
}

impl FromStr for NotificationType {
    type Err = NotificationMonitorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Delivery" => Ok(NotificationType::Delivery),
            "Bounce" => Ok(NotificationType::Bounce),
            other => Err(NotificationMonitorError::new(
                &format!("Unsupported notification type {other}"),
                "Notification type must be Delivery or Bounce",
            )),
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            NotificationType::Delivery => write!(f, "Delivery"),
            NotificationType::Bounce => write!(f, "Bounce"),
        }
    }
}

/// SQS body written by an SNS subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct SqsBody {
    #[serde(rename = "Message")]
    pub message: Option<String>,
}

/// SES notification carried, JSON encoded, in [`SqsBody::message`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SesMessage {
    pub notification_type: String,
    pub mail: Option<SesMail>,
    pub delivery: Option<SesDelivery>,
    pub bounce: Option<SesBounce>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SesMail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub destination: Vec<String>,
    pub timestamp: Option<String>,
    pub headers: Option<Vec<SesHeader>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SesHeader {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SesDelivery {
    pub smtp_response: Option<String>,
}

/// Bounce section as received. Fields not modelled here are kept in `other`
/// so the whole substructure survives normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SesBounce {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounce_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounce_sub_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bounced_recipients: Vec<SesBouncedRecipient>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SesBouncedRecipient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic_code: Option<String>,
}

/// Explicit `null` reads like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Fields every notification carries, taken from the `mail` section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MailSummary {
    /// `YYYY-MM-DD HH:MM:SS`, UTC. Fixed width, so it sorts as text.
    pub timestamp: String,
    pub to: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryRecord {
    #[serde(flatten)]
    pub mail: MailSummary,
    pub smtp_response: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BounceRecord {
    #[serde(flatten)]
    pub mail: MailSummary,
    pub reason: String,
    pub action: String,
    pub diagnostic_code: String,
    pub status: String,
    pub bounce: SesBounce,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum NotificationRecord {
    Delivery(DeliveryRecord),
    Bounce(BounceRecord),
}

impl NotificationRecord {
    pub fn notification_type(&self) -> NotificationType {
        match self {
            NotificationRecord::Delivery(_) => NotificationType::Delivery,
            NotificationRecord::Bounce(_) => NotificationType::Bounce,
        }
    }

    pub fn mail(&self) -> &MailSummary {
        match self {
            NotificationRecord::Delivery(delivery) => &delivery.mail,
            NotificationRecord::Bounce(bounce) => &bounce.mail,
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.mail().timestamp
    }
}

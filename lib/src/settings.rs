use crate::environment::Environment;
use crate::error::NotificationMonitorError;
use crate::notification::NotificationType;
use crate::presenter::EmptyRendering;
use crate::scheduler::FailurePolicy;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CYCLES: u32 = 5;
pub const DEFAULT_INTERVAL_IN_MILLIS: u64 = 1000;

#[derive(Clone, Debug, PartialEq)]
pub struct MonitorSettings {
    pub queue_url: String,
    pub notification_type: NotificationType,
    pub node_id: String,
    pub table_class: String,
    pub cycles: u32,
    pub interval_in_millis: u64,
    pub failure_policy: FailurePolicy,
    pub empty_rendering: EmptyRendering,
}

impl MonitorSettings {
    pub fn new(
        queue_url: &str,
        notification_type: NotificationType,
    ) -> Self {
        Self {
            queue_url: queue_url.to_string(),
            notification_type,
            node_id: format!("ses-{}", notification_type.to_string().to_lowercase()),
            table_class: String::new(),
            cycles: DEFAULT_CYCLES,
            interval_in_millis: DEFAULT_INTERVAL_IN_MILLIS,
            failure_policy: FailurePolicy::default(),
            empty_rendering: EmptyRendering::default(),
        }
    }

    pub fn from_env() -> Result<Self, NotificationMonitorError> {
        let queue_url = Environment::required_string("QUEUE_URL")?;
        let notification_type = NotificationType::from_str(&Environment::string("NOTIFICATION_TYPE", "Delivery"))?;

        let mut settings = Self::new(&queue_url, notification_type)
            .with_table_class(&Environment::string("TABLE_CLASS", ""))
            .with_cycles(Environment::u32("POLL_CYCLES", DEFAULT_CYCLES)?)
            .with_interval_in_millis(Environment::u64("POLL_INTERVAL_IN_MILLIS", DEFAULT_INTERVAL_IN_MILLIS)?);

        if let Ok(node_id) = Environment::required_string("NODE_ID") {
            settings = settings.with_node_id(&node_id);
        }

        if Environment::boolean("CONTINUE_ON_FAILURE", false)? {
            settings = settings.with_failure_policy(FailurePolicy::Continue);
        }

        if Environment::boolean("RENDER_EMPTY_TABLE", false)? {
            settings = settings.with_empty_rendering(EmptyRendering::Shell);
        }

        Ok(settings)
    }

    pub fn with_node_id(
        self,
        node_id: &str,
    ) -> Self {
        Self {
            node_id: node_id.to_string(),
            ..self
        }
    }

    pub fn with_table_class(
        self,
        table_class: &str,
    ) -> Self {
        Self {
            table_class: table_class.to_string(),
            ..self
        }
    }

    pub fn with_cycles(
        self,
        cycles: u32,
    ) -> Self {
        Self { cycles, ..self }
    }

    pub fn with_interval_in_millis(
        self,
        interval_in_millis: u64,
    ) -> Self {
        Self { interval_in_millis, ..self }
    }

    pub fn with_failure_policy(
        self,
        failure_policy: FailurePolicy,
    ) -> Self {
        Self { failure_policy, ..self }
    }

    pub fn with_empty_rendering(
        self,
        empty_rendering: EmptyRendering,
    ) -> Self {
        Self { empty_rendering, ..self }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_in_millis)
    }
}

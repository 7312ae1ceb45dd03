use crate::infra::error::AppError;
use aws_config::BehaviorVersion;
use ses_notifications_monitor::aws::SqsClient;
use ses_notifications_monitor::environment::Environment;
use ses_notifications_monitor::mount::SharedMarkup;
use ses_notifications_monitor::settings::MonitorSettings;

#[derive(Clone)]
pub struct AppState {
    pub sqs_client: SqsClient,
    pub settings: MonitorSettings,
    pub markup: SharedMarkup,
    pub http_port: u16,
}

impl AppState {
    pub async fn new() -> Result<Self, AppError> {
        let settings = MonitorSettings::from_env().map_err(|error| AppError::new(&error.cause, &error.message_or("Failed to load monitor settings")))?;

        let http_port = Environment::u16("HTTP_PORT", 9095).map_err(|error| AppError::new(&error.cause, &error.message_or("Failed to load http port")))?;

        let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let sqs_client = SqsClient::new(&aws_config);

        Ok(Self {
            sqs_client,
            settings,
            markup: SharedMarkup::new(),
            http_port,
        })
    }

    pub fn refresh_in_seconds(&self) -> u64 {
        self.settings.interval().as_secs().max(1)
    }
}

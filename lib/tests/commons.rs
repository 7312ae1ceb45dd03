#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use serde_json::{json, Value};
use ses_notifications_monitor::aws::SqsClient;
use ses_notifications_monitor::clock::Clock;
use ses_notifications_monitor::error::NotificationMonitorError;
use ses_notifications_monitor::mount::MountPoint;
use ses_notifications_monitor::queue::{QueueProvider, RawEnvelope};
use ses_notifications_monitor::scheduler::{PollScheduler, SessionStopper};
use ses_notifications_monitor::settings::MonitorSettings;
use std::collections::VecDeque;
use std::future::{self, Future};
use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use test_context::AsyncTestContext;
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;
use wiremock::MockServer;

pub const QUEUE_URL: &str = "http://localhost:4566/000000000000/ses-notifications";

pub struct TestContext {
    pub mock_server: MockServer,
    pub sqs_client: SqsClient,
    pub queue_url: String,
}

impl AsyncTestContext for TestContext {
    async fn setup() -> Self {
        let mock_server = Infrastructure::init_mock_server().await;
        let sqs_client = Infrastructure::init_sqs_client(&mock_server.uri());

        Self {
            mock_server,
            sqs_client,
            queue_url: QUEUE_URL.to_string(),
        }
    }
}

pub struct SessionContext {
    pub queue: FakeQueue,
    pub clock: ManualClock,
    pub mount: RecordingMount,
}

impl AsyncTestContext for SessionContext {
    async fn setup() -> Self {
        Self {
            queue: FakeQueue::default(),
            clock: ManualClock::default(),
            mount: RecordingMount::default(),
        }
    }
}

impl SessionContext {
    pub fn scheduler(
        &self,
        batches: Vec<Result<Vec<RawEnvelope>, NotificationMonitorError>>,
        settings: MonitorSettings,
    ) -> PollScheduler<FakeQueue, ManualClock, RecordingMount> {
        self.queue.enqueue(batches);
        PollScheduler::new(self.queue.clone(), self.clock.clone(), self.mount.clone(), settings)
    }
}

pub struct Infrastructure;

impl Infrastructure {
    fn init_sqs_client(endpoint: &str) -> SqsClient {
        use aws_sdk_sqs::config::{BehaviorVersion, Credentials, Region};

        let config = aws_sdk_sqs::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("ses-notifications-monitor", "ses-notifications-monitor", None, None, "test"))
            .endpoint_url(endpoint)
            .build();

        SqsClient::from_client(aws_sdk_sqs::Client::from_conf(config))
    }

    async fn init_mock_server() -> MockServer {
        for _ in 1..10 {
            let port = rand::thread_rng().gen_range(51000..54000);
            let addr = SocketAddr::from(([127, 0, 0, 1], port));
            if let Ok(listener) = TcpListener::bind(addr) {
                return MockServer::builder().listener(listener).start().await;
            }
        }

        panic!("Failed to create mock server");
    }
}

pub struct DefaultData;

impl DefaultData {
    pub fn delivery_message(
        recipient: &str,
        subject: &str,
        timestamp: &str,
    ) -> Value {
        json!({
            "notificationType": "Delivery",
            "mail": {
                "destination": [recipient],
                "timestamp": timestamp,
                "headers": [{"name": "Subject", "value": subject}]
            },
            "delivery": {"smtpResponse": "250 OK"}
        })
    }

    pub fn bounce_message(
        recipient: &str,
        timestamp: &str,
    ) -> Value {
        json!({
            "notificationType": "Bounce",
            "mail": {"destination": [recipient], "timestamp": timestamp},
            "bounce": {
                "bounceType": "Permanent",
                "bounceSubType": "General",
                "bouncedRecipients": [{"emailAddress": recipient, "action": "failed", "status": "5.1.1", "diagnosticCode": "smtp; 550"}]
            }
        })
    }

    pub fn body(message: &Value) -> String {
        json!({ "Type": "Notification", "Message": message.to_string() }).to_string()
    }

    pub fn delivery(
        message_id: &str,
        subject: &str,
        timestamp: &str,
    ) -> RawEnvelope {
        RawEnvelope::new(message_id, &Self::body(&Self::delivery_message("a@x.com", subject, timestamp)))
    }

    pub fn bounce(
        message_id: &str,
        timestamp: &str,
    ) -> RawEnvelope {
        RawEnvelope::new(message_id, &Self::body(&Self::bounce_message("a@x.com", timestamp)))
    }

    pub fn transport_error() -> NotificationMonitorError {
        NotificationMonitorError::new("connection reset by peer", "Failed to receive sqs messages")
    }
}

/// Queue returning scripted batches in order, then empty batches.
#[derive(Clone, Default)]
pub struct FakeQueue {
    batches: Arc<Mutex<VecDeque<Result<Vec<RawEnvelope>, NotificationMonitorError>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeQueue {
    pub fn with_batches(batches: Vec<Result<Vec<RawEnvelope>, NotificationMonitorError>>) -> Self {
        Self {
            batches: Arc::new(Mutex::new(batches.into())),
            calls: Arc::default(),
        }
    }

    pub fn enqueue(
        &self,
        batches: Vec<Result<Vec<RawEnvelope>, NotificationMonitorError>>,
    ) {
        self.batches.lock().unwrap().extend(batches);
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn queue_urls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl QueueProvider for FakeQueue {
    fn fetch_batch(
        &self,
        queue_url: &str,
    ) -> impl Future<Output = Result<Vec<RawEnvelope>, NotificationMonitorError>> + Send {
        self.calls.lock().unwrap().push(queue_url.to_string());
        let batch = self.batches.lock().unwrap().pop_front().unwrap_or(Ok(vec![]));
        future::ready(batch)
    }
}

/// Clock that never really sleeps. It records every requested delay and can stop
/// a session the moment the scheduler starts waiting.
#[derive(Clone)]
pub struct ManualClock {
    now: DateTime<Utc>,
    sleeps: Arc<Mutex<Vec<Duration>>>,
    stop_on_sleep: Arc<Mutex<Option<(usize, SessionStopper)>>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            now: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            sleeps: Arc::default(),
            stop_on_sleep: Arc::default(),
        }
    }
}

impl ManualClock {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    /// Stops the session when the `nth` delay (1-based) is requested.
    pub fn stop_at_sleep(
        &self,
        nth: usize,
        stopper: SessionStopper,
    ) {
        *self.stop_on_sleep.lock().unwrap() = Some((nth, stopper));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn sleep(
        &self,
        duration: Duration,
    ) -> impl Future<Output = ()> + Send {
        let mut sleeps = self.sleeps.lock().unwrap();
        sleeps.push(duration);

        if let Some((nth, stopper)) = self.stop_on_sleep.lock().unwrap().as_ref() {
            if sleeps.len() == *nth {
                stopper.stop();
            }
        }

        future::ready(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingMount {
    markups: Arc<Mutex<Vec<String>>>,
}

impl RecordingMount {
    pub fn markups(&self) -> Vec<String> {
        self.markups.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.markups.lock().unwrap().last().cloned()
    }
}

impl MountPoint for RecordingMount {
    fn mount(
        &self,
        markup: String,
    ) {
        self.markups.lock().unwrap().push(markup);
    }
}

/// Counts `error` events emitted on the current thread while its guard is alive.
#[derive(Clone, Default)]
pub struct ErrorCounter {
    count: Arc<AtomicUsize>,
}

impl ErrorCounter {
    pub fn install(&self) -> DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(
        &self,
        event: &Event<'_>,
        _ctx: Context<'_, S>,
    ) {
        if *event.metadata().level() == Level::ERROR {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

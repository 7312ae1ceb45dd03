use crate::accumulator::AccumulatedState;
use crate::clock::Clock;
use crate::error::NotificationMonitorError;
use crate::mount::MountPoint;
use crate::normalizer::Normalizer;
use crate::presenter::Presenter;
use crate::queue::QueueProvider;
use crate::settings::MonitorSettings;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
    Merging,
    Rendering,
    Waiting,
    Done,
}

/// What a session does after a cycle failed to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// End the session and hand the error back to the caller.
    #[default]
    Stop,
    /// Skip the failed tick and keep the schedule.
    Continue,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionReport {
    pub cycles_completed: u32,
    pub records: usize,
    pub failures: Vec<NotificationMonitorError>,
    pub stopped: bool,
}

/// Stops a running session before its next tick. Stopping is permanent for the
/// scheduler it came from.
#[derive(Clone, Debug)]
pub struct SessionStopper {
    token: CancellationToken,
}

impl SessionStopper {
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}

enum Wake {
    Elapsed,
    Stopped,
}

/// Drives fetch, normalize, merge and render cycles for one queue.
///
/// Cycles run strictly one after the other and the accumulated state is owned here,
/// so no locking is involved.
pub struct PollScheduler<P, C, M> {
    provider: P,
    clock: C,
    mount: M,
    settings: MonitorSettings,
    presenter: Presenter,
    state: AccumulatedState,
    phase: Phase,
    cancellation: CancellationToken,
}

impl<P, C, M> PollScheduler<P, C, M>
where
    P: QueueProvider,
    C: Clock,
    M: MountPoint,
{
    pub fn new(
        provider: P,
        clock: C,
        mount: M,
        settings: MonitorSettings,
    ) -> Self {
        let presenter = Presenter::new(settings.notification_type).with_empty_rendering(settings.empty_rendering);
        let state = AccumulatedState::new(clock.now());

        Self {
            provider,
            clock,
            mount,
            settings,
            presenter,
            state,
            phase: Phase::Idle,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn stopper(&self) -> SessionStopper {
        SessionStopper {
            token: self.cancellation.clone(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &AccumulatedState {
        &self.state
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Runs a whole session and resets whatever a previous session accumulated.
    pub async fn start(&mut self) -> Result<SessionReport, NotificationMonitorError> {
        self.state.reset(self.clock.now());
        let mut report = SessionReport::default();

        info!(
            queue_url = %self.settings.queue_url,
            notification_type = %self.settings.notification_type,
            cycles = self.settings.cycles,
            "Starting notification polling session..."
        );

        loop {
            if self.cancellation.is_cancelled() {
                report.stopped = true;
                break;
            }

            match self.cycle().await {
                Ok(inserted) => {
                    report.cycles_completed += 1;
                    debug!(iteration = self.state.iteration(), inserted, total = self.state.len(), "Notification polling cycle done");
                },
                Err(error) => {
                    error!(
                        iteration = self.state.iteration(),
                        queue_url = %self.settings.queue_url,
                        "Notification polling cycle failed: {} - Cause: {}",
                        error.message_or("Failed to fetch notifications"),
                        error.cause
                    );
                    report.failures.push(error.clone());

                    if self.settings.failure_policy == FailurePolicy::Stop {
                        self.phase = Phase::Done;
                        return Err(error);
                    }
                },
            }

            if self.state.iteration() + 1 >= self.settings.cycles {
                break;
            }

            self.state.advance();
            self.phase = Phase::Waiting;

            if let Wake::Stopped = self.wait().await {
                report.stopped = true;
                break;
            }
        }

        self.phase = Phase::Done;
        report.records = self.state.len();

        info!(
            cycles_completed = report.cycles_completed,
            records = report.records,
            stopped = report.stopped,
            "Notification polling session stopped!"
        );

        Ok(report)
    }

    async fn cycle(&mut self) -> Result<usize, NotificationMonitorError> {
        self.phase = Phase::Fetching;
        let envelopes = self.provider.fetch_batch(&self.settings.queue_url).await?;

        self.phase = Phase::Merging;
        let records = envelopes
            .iter()
            .filter_map(|envelope| Normalizer::normalize(envelope).map(|record| (envelope.message_id.clone(), record)));
        let inserted = self.state.merge(records);

        self.phase = Phase::Rendering;
        self.render();

        Ok(inserted)
    }

    fn render(&self) {
        let markup = self
            .presenter
            .render(&self.state)
            .map(|table| table.to_html(&self.settings.node_id, self.settings.notification_type, &self.settings.table_class))
            .unwrap_or_default();

        self.mount.mount(markup);
    }

    async fn wait(&self) -> Wake {
        let sleep = self.clock.sleep(self.settings.interval());

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Wake::Stopped,
            _ = sleep => Wake::Elapsed,
        }
    }
}

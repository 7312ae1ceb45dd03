use crate::clock::TokioClock;
use crate::error::NotificationMonitorError;
use crate::mount::MountPoint;
use crate::queue::QueueProvider;
use crate::scheduler::{PollScheduler, SessionReport};
use crate::settings::MonitorSettings;

/// Polls `settings.queue_url` and keeps `mount` showing the current table until the
/// session ends.
pub async fn start_session<P, M>(
    provider: P,
    mount: M,
    settings: MonitorSettings,
) -> Result<SessionReport, NotificationMonitorError>
where
    P: QueueProvider,
    M: MountPoint,
{
    PollScheduler::new(provider, TokioClock, mount, settings).start().await
}

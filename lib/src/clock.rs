use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;

/// Time source for the poll scheduler, swapped out in tests.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn sleep(
        &self,
        duration: Duration,
    ) -> impl Future<Output = ()> + Send;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(
        &self,
        duration: Duration,
    ) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

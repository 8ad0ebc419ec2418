use chrono::{DateTime, Utc};

/// Source of "now" for the scheduling engine. Injected so date-sensitive
/// logic (past-date rejection, same-day slot filtering, expired resolution)
/// is testable with a fixed instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time. Deployments outside UTC supply their own `Clock` mapped
/// to the clinic's local timezone.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

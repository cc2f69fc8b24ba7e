use std::future::Future;

use super::snapshot::StatusSnapshot;

/// Anything that can report the current status of a tracked job.
///
/// Implementations must not surface transport failures: when the job cannot
/// be reached they resolve to [`StatusSnapshot::degraded`] instead.
pub trait StatusSource {
    fn fetch_status(&self) -> impl Future<Output = StatusSnapshot> + Send;
}

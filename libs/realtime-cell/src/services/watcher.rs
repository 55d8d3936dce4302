use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use dashboard_cell::services::stats::DashboardStatsService;
use shared_database::store::{AppointmentStore, StoreError};
use shared_utils::clock::Clock;

use crate::services::broadcast::EventBroadcaster;

/// Polls the appointment store for records mutated since the last
/// successful check and republishes dashboard state when anything moved.
///
/// This is the safety net behind the booking path's own publications: it
/// also catches cancellations and administrative edits that never pass
/// through a booking transaction. The watcher owns its watermark outright;
/// exactly one watcher task runs per process and ticks never overlap.
pub struct ChangeWatcher {
    appointments: Arc<dyn AppointmentStore>,
    stats: Arc<DashboardStatsService>,
    broadcaster: Arc<EventBroadcaster>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
    watermark: DateTime<Utc>,
}

impl ChangeWatcher {
    pub fn new(
        appointments: Arc<dyn AppointmentStore>,
        stats: Arc<DashboardStatsService>,
        broadcaster: Arc<EventBroadcaster>,
        clock: Arc<dyn Clock>,
        poll_interval: Duration,
    ) -> Self {
        // Start just behind "now" so boot does not replay the entire
        // mutation history.
        let watermark = clock.now() - chrono::Duration::seconds(1);
        Self {
            appointments,
            stats,
            broadcaster,
            clock,
            poll_interval,
            watermark,
        }
    }

    /// Recurring loop; spawn once at startup. A failed cycle is logged and
    /// the next tick retries independently.
    pub async fn run(mut self) {
        info!(
            "Change watcher started, polling every {:?} from watermark {}",
            self.poll_interval, self.watermark
        );

        let mut ticker = tokio::time::interval(self.poll_interval);
        // A tick still in flight delays the next one; ticks never run
        // concurrently with each other.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = self.poll_once().await {
                error!("Error checking for appointment changes: {}", e);
            }
        }
    }

    /// One poll cycle. Returns how many mutated records were seen; a
    /// non-zero result means exactly one dashboard broadcast went out and
    /// the watermark advanced to this cycle's start time.
    pub async fn poll_once(&mut self) -> Result<usize, StoreError> {
        // Captured before the query: records updated between the query and
        // the watermark assignment must be seen by the next cycle.
        let cycle_start = self.clock.now();

        let updated = self.appointments.find_updated_after(self.watermark).await?;
        if updated.is_empty() {
            return Ok(0);
        }

        info!(
            "Found {} appointments updated since {}",
            updated.len(),
            self.watermark
        );

        let stats = self.stats.snapshot().await?;
        self.broadcaster.publish_dashboard(&stats);

        self.watermark = cycle_start;
        Ok(updated.len())
    }

    pub fn watermark(&self) -> DateTime<Utc> {
        self.watermark
    }
}

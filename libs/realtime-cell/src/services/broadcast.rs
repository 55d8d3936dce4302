use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, error};

use shared_models::domain::DashboardStats;

pub const TOPIC_APPOINTMENTS: &str = "appointments";
pub const TOPIC_DASHBOARD: &str = "dashboard";

pub type TopicReceiver = broadcast::Receiver<String>;

/// Fan-out point between the mutation paths (booking, cancel, watcher) and
/// live dashboard/detail viewers.
///
/// Each topic is a `tokio::sync::broadcast` channel: publishing never
/// blocks beyond the enqueue, a subscriber is just a receiver owned by its
/// connection task, and dropping that receiver is the deregistration. A
/// slow subscriber lags on its own receiver without holding anyone else up.
pub struct EventBroadcaster {
    appointments: broadcast::Sender<String>,
    dashboard: broadcast::Sender<String>,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (appointments, _) = broadcast::channel(capacity);
        let (dashboard, _) = broadcast::channel(capacity);
        Self {
            appointments,
            dashboard,
        }
    }

    /// Push a single appointment projection to `appointments` viewers.
    /// Returns the number of subscribers the event was queued for.
    pub fn publish_appointment<T: Serialize>(&self, payload: &T) -> usize {
        Self::publish(&self.appointments, TOPIC_APPOINTMENTS, payload)
    }

    /// Push a fresh stats snapshot to `dashboard` viewers.
    pub fn publish_dashboard(&self, stats: &DashboardStats) -> usize {
        Self::publish(&self.dashboard, TOPIC_DASHBOARD, stats)
    }

    pub fn subscribe_appointments(&self) -> TopicReceiver {
        self.appointments.subscribe()
    }

    pub fn subscribe_dashboard(&self) -> TopicReceiver {
        self.dashboard.subscribe()
    }

    pub fn appointment_subscribers(&self) -> usize {
        self.appointments.receiver_count()
    }

    pub fn dashboard_subscribers(&self) -> usize {
        self.dashboard.receiver_count()
    }

    fn publish<T: Serialize>(sender: &broadcast::Sender<String>, topic: &str, payload: &T) -> usize {
        let message = match serde_json::to_string(payload) {
            Ok(message) => message,
            Err(e) => {
                error!("Failed to serialize {} event: {}", topic, e);
                return 0;
            }
        };

        match sender.send(message) {
            Ok(delivered) => {
                debug!("Queued {} event for {} subscribers", topic, delivered);
                delivered
            }
            Err(_) => {
                // Nobody is listening right now; events are hints, not state.
                debug!("No subscribers on {}, event dropped", topic);
                0
            }
        }
    }
}

pub mod handlers;
pub mod router;
pub mod services;

pub use router::realtime_routes;
pub use services::broadcast::{EventBroadcaster, TOPIC_APPOINTMENTS, TOPIC_DASHBOARD};
pub use services::watcher::ChangeWatcher;

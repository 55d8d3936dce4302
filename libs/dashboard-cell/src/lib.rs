pub mod handlers;
pub mod router;
pub mod services;

pub use router::dashboard_routes;
pub use services::stats::DashboardStatsService;

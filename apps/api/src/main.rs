use std::net::SocketAddr;
use std::sync::Arc;

use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;
mod seed;

use appointment_cell::services::booking::AppointmentBookingService;
use dashboard_cell::services::stats::DashboardStatsService;
use patient_cell::services::profile::ProfileService;
use realtime_cell::services::broadcast::EventBroadcaster;
use realtime_cell::services::watcher::ChangeWatcher;
use shared_config::AppConfig;
use shared_database::memory::MemoryStore;
use shared_database::store::{AppointmentStore, DirectoryStore, PatientProfileStore};
use shared_utils::clock::{Clock, SystemClock};

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting appointment booking API server");

    let config = AppConfig::from_env();

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let store = Arc::new(MemoryStore::new(Arc::clone(&clock)));
    seed::seed_demo_directory(&store).await;

    let directory: Arc<dyn DirectoryStore> = store.clone();
    let profiles: Arc<dyn PatientProfileStore> = store.clone();
    let appointments: Arc<dyn AppointmentStore> = store.clone();

    let broadcaster = Arc::new(EventBroadcaster::new(config.broadcast_capacity));
    let stats = Arc::new(DashboardStatsService::new(
        Arc::clone(&directory),
        Arc::clone(&appointments),
    ));
    let profile_service = Arc::new(ProfileService::new(Arc::clone(&profiles)));
    let booking_service = Arc::new(AppointmentBookingService::new(
        Arc::clone(&directory),
        Arc::clone(&profiles),
        Arc::clone(&appointments),
        Arc::clone(&stats),
        Arc::clone(&broadcaster),
        config.recent_appointments_limit,
    ));

    // One watcher task per process; it owns the watermark outright.
    let watcher = ChangeWatcher::new(
        Arc::clone(&appointments),
        Arc::clone(&stats),
        Arc::clone(&broadcaster),
        Arc::clone(&clock),
        config.watcher_poll_interval(),
    );
    tokio::spawn(watcher.run());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router::create_router(booking_service, profile_service, stats, broadcaster)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await.expect("bind listener");
    axum::serve(listener, app).await.expect("serve");
}

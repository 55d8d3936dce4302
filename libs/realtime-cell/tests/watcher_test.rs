use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use tokio::sync::broadcast::error::TryRecvError;

use dashboard_cell::services::stats::DashboardStatsService;
use realtime_cell::services::broadcast::EventBroadcaster;
use realtime_cell::services::watcher::ChangeWatcher;
use shared_database::memory::MemoryStore;
use shared_database::store::{AppointmentStore, StoreError};
use shared_models::domain::{
    AppointmentRecord, AppointmentStatus, NewAppointment, PatientProfile,
};
use shared_utils::clock::{Clock, ManualClock};

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
}

struct Fixture {
    clock: Arc<ManualClock>,
    store: Arc<MemoryStore>,
    broadcaster: Arc<EventBroadcaster>,
    watcher: ChangeWatcher,
}

fn fixture() -> Fixture {
    let clock = Arc::new(ManualClock::new(start_time()));
    let store = Arc::new(MemoryStore::new(Arc::clone(&clock) as Arc<dyn Clock>));
    let broadcaster = Arc::new(EventBroadcaster::new(16));
    let stats = Arc::new(DashboardStatsService::new(store.clone(), store.clone()));
    let watcher = ChangeWatcher::new(
        store.clone(),
        stats,
        Arc::clone(&broadcaster),
        Arc::clone(&clock) as Arc<dyn Clock>,
        StdDuration::from_secs(2),
    );

    Fixture {
        clock,
        store,
        broadcaster,
        watcher,
    }
}

async fn book_one(store: &MemoryStore, user_id: i64) -> AppointmentRecord {
    let profile = PatientProfile {
        user_id,
        name: format!("Patient {}", user_id),
        dob: None,
        gender: None,
        mobile_number: None,
        age: None,
        last_appointment: None,
    };
    let appointment = NewAppointment {
        patient_user_id: user_id,
        doctor_id: 10,
        hospital_id: 100,
        appointment_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        appointment_time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
    };
    store.create_booking(profile, appointment).await.unwrap()
}

#[tokio::test]
async fn empty_cycle_broadcasts_nothing_and_keeps_the_watermark() {
    let mut fx = fixture();
    let mut dashboard_rx = fx.broadcaster.subscribe_dashboard();
    let initial = fx.watcher.watermark();

    fx.clock.advance(Duration::seconds(2));
    let seen = fx.watcher.poll_once().await.unwrap();

    assert_eq!(seen, 0);
    assert_eq!(fx.watcher.watermark(), initial);
    assert_eq!(dashboard_rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn one_broadcast_per_busy_cycle_no_matter_how_many_changes() {
    let mut fx = fixture();
    let mut dashboard_rx = fx.broadcaster.subscribe_dashboard();

    fx.clock.advance(Duration::seconds(1));
    for user_id in 1..=3 {
        book_one(&fx.store, user_id).await;
    }

    fx.clock.advance(Duration::seconds(1));
    let seen = fx.watcher.poll_once().await.unwrap();
    assert_eq!(seen, 3);

    // Exactly one dashboard snapshot went out for the whole batch.
    let event: serde_json::Value =
        serde_json::from_str(&dashboard_rx.try_recv().unwrap()).unwrap();
    assert_eq!(event["totalAppointments"], 3);
    assert_eq!(dashboard_rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn watermark_advances_to_cycle_start_after_a_busy_cycle() {
    let mut fx = fixture();

    fx.clock.advance(Duration::seconds(1));
    book_one(&fx.store, 1).await;

    fx.clock.advance(Duration::seconds(1));
    let cycle_start = fx.clock.now();
    fx.watcher.poll_once().await.unwrap();
    assert_eq!(fx.watcher.watermark(), cycle_start);

    // The booking from the previous cycle is now behind the watermark.
    let seen = fx.watcher.poll_once().await.unwrap();
    assert_eq!(seen, 0);
}

#[tokio::test]
async fn boot_watermark_starts_one_second_behind_now() {
    let fx = fixture();
    assert_eq!(fx.watcher.watermark(), start_time() - Duration::seconds(1));
}

#[tokio::test]
async fn outside_path_mutations_are_picked_up() {
    let mut fx = fixture();
    let mut dashboard_rx = fx.broadcaster.subscribe_dashboard();

    fx.clock.advance(Duration::seconds(1));
    let booked = book_one(&fx.store, 1).await;
    fx.clock.advance(Duration::seconds(1));
    fx.watcher.poll_once().await.unwrap();
    dashboard_rx.try_recv().unwrap();

    // A status change made directly against the store, bypassing the
    // booking service entirely.
    fx.clock.advance(Duration::seconds(1));
    fx.store
        .update_status(booked.id, AppointmentStatus::Cancelled)
        .await
        .unwrap();

    fx.clock.advance(Duration::seconds(1));
    let seen = fx.watcher.poll_once().await.unwrap();
    assert_eq!(seen, 1);

    let event: serde_json::Value =
        serde_json::from_str(&dashboard_rx.try_recv().unwrap()).unwrap();
    assert_eq!(event["cancelledAppointments"], 1);
}

struct BrokenStore;

#[async_trait]
impl AppointmentStore for BrokenStore {
    async fn create_booking(
        &self,
        _profile: PatientProfile,
        _appointment: NewAppointment,
    ) -> Result<AppointmentRecord, StoreError> {
        Err(StoreError::Backend("down".to_string()))
    }

    async fn get(&self, _id: i64) -> Result<Option<AppointmentRecord>, StoreError> {
        Err(StoreError::Backend("down".to_string()))
    }

    async fn find_by_tracking_id(
        &self,
        _tracking_id: &str,
    ) -> Result<Option<AppointmentRecord>, StoreError> {
        Err(StoreError::Backend("down".to_string()))
    }

    async fn list_by_patient(&self, _user_id: i64) -> Result<Vec<AppointmentRecord>, StoreError> {
        Err(StoreError::Backend("down".to_string()))
    }

    async fn list_recent(&self, _limit: usize) -> Result<Vec<AppointmentRecord>, StoreError> {
        Err(StoreError::Backend("down".to_string()))
    }

    async fn update_status(
        &self,
        _id: i64,
        _status: AppointmentStatus,
    ) -> Result<AppointmentRecord, StoreError> {
        Err(StoreError::Backend("down".to_string()))
    }

    async fn find_updated_after(
        &self,
        _watermark: DateTime<Utc>,
    ) -> Result<Vec<AppointmentRecord>, StoreError> {
        Err(StoreError::Backend("down".to_string()))
    }

    async fn count_appointments(&self) -> Result<u64, StoreError> {
        Err(StoreError::Backend("down".to_string()))
    }

    async fn count_by_status(&self, _status: AppointmentStatus) -> Result<u64, StoreError> {
        Err(StoreError::Backend("down".to_string()))
    }
}

#[tokio::test]
async fn a_failed_cycle_leaves_the_watermark_alone() {
    let clock = Arc::new(ManualClock::new(start_time()));
    let healthy = Arc::new(MemoryStore::new(Arc::clone(&clock) as Arc<dyn Clock>));
    let broadcaster = Arc::new(EventBroadcaster::new(16));
    let stats = Arc::new(DashboardStatsService::new(healthy.clone(), healthy.clone()));
    let mut watcher = ChangeWatcher::new(
        Arc::new(BrokenStore),
        stats,
        Arc::clone(&broadcaster),
        Arc::clone(&clock) as Arc<dyn Clock>,
        StdDuration::from_secs(2),
    );
    let mut dashboard_rx = broadcaster.subscribe_dashboard();
    let initial = watcher.watermark();

    clock.advance(Duration::seconds(5));
    let result = watcher.poll_once().await;

    assert!(result.is_err());
    assert_eq!(watcher.watermark(), initial);
    assert_eq!(dashboard_rx.try_recv(), Err(TryRecvError::Empty));
}

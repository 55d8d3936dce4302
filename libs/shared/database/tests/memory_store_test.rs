use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use shared_database::memory::MemoryStore;
use shared_database::store::{AppointmentStore, PatientProfileStore, StoreError};
use shared_models::domain::{AppointmentStatus, NewAppointment, PatientProfile};
use shared_utils::clock::{Clock, ManualClock};

fn test_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap(),
    ))
}

fn profile_for(user_id: i64) -> PatientProfile {
    PatientProfile {
        user_id,
        name: format!("Patient {}", user_id),
        dob: None,
        gender: None,
        mobile_number: None,
        age: None,
        last_appointment: None,
    }
}

fn appointment_for(user_id: i64) -> NewAppointment {
    NewAppointment {
        patient_user_id: user_id,
        doctor_id: 1,
        hospital_id: 1,
        appointment_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        appointment_time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
    }
}

#[tokio::test]
async fn booking_commits_profile_and_appointment_together() {
    let store = MemoryStore::new(test_clock());

    let record = store
        .create_booking(profile_for(7), appointment_for(7))
        .await
        .unwrap();

    assert_eq!(record.id, 1);
    assert_eq!(record.status, AppointmentStatus::Booked);
    assert_eq!(record.created_at, record.updated_at);

    let profile = store.find_profile(7).await.unwrap();
    assert_eq!(profile.unwrap().name, "Patient 7");
}

#[tokio::test]
async fn tracking_ids_follow_the_id_sequence() {
    let clock = test_clock();
    let store = MemoryStore::new(clock);

    let first = store
        .create_booking(profile_for(1), appointment_for(1))
        .await
        .unwrap();
    let second = store
        .create_booking(profile_for(2), appointment_for(2))
        .await
        .unwrap();

    assert_eq!(first.tracking_id, "HCMS-2025-0001");
    assert_eq!(second.tracking_id, "HCMS-2025-0002");
}

#[tokio::test]
async fn concurrent_bookings_never_mint_the_same_tracking_id() {
    let store = Arc::new(MemoryStore::new(test_clock()));

    let mut handles = Vec::new();
    for user_id in 0..50 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .create_booking(profile_for(user_id), appointment_for(user_id))
                .await
                .unwrap()
                .tracking_id
        }));
    }

    let mut tracking_ids = Vec::new();
    for handle in handles {
        tracking_ids.push(handle.await.unwrap());
    }

    tracking_ids.sort();
    tracking_ids.dedup();
    assert_eq!(tracking_ids.len(), 50, "every booking gets a distinct id");
}

#[tokio::test]
async fn update_status_bumps_updated_at_only() {
    let clock = test_clock();
    let store = MemoryStore::new(Arc::clone(&clock) as Arc<dyn Clock>);

    let record = store
        .create_booking(profile_for(1), appointment_for(1))
        .await
        .unwrap();

    clock.advance(Duration::seconds(30));
    let updated = store
        .update_status(record.id, AppointmentStatus::Cancelled)
        .await
        .unwrap();

    assert_eq!(updated.status, AppointmentStatus::Cancelled);
    assert_eq!(updated.created_at, record.created_at);
    assert!(updated.updated_at > updated.created_at);
    assert_eq!(updated.tracking_id, record.tracking_id);
}

#[tokio::test]
async fn update_status_of_unknown_id_is_not_found() {
    let store = MemoryStore::new(test_clock());
    let result = store.update_status(99, AppointmentStatus::Cancelled).await;
    assert_matches!(result, Err(StoreError::NotFound(_)));
}

#[tokio::test]
async fn find_updated_after_is_strictly_after() {
    let clock = test_clock();
    let store = MemoryStore::new(Arc::clone(&clock) as Arc<dyn Clock>);

    let record = store
        .create_booking(profile_for(1), appointment_for(1))
        .await
        .unwrap();

    // Boundary timestamp itself does not count as "after".
    let at_boundary = store.find_updated_after(record.updated_at).await.unwrap();
    assert!(at_boundary.is_empty());

    let just_before = store
        .find_updated_after(record.updated_at - Duration::milliseconds(1))
        .await
        .unwrap();
    assert_eq!(just_before.len(), 1);
}

#[tokio::test]
async fn listings_are_newest_first_and_limited() {
    let clock = test_clock();
    let store = MemoryStore::new(Arc::clone(&clock) as Arc<dyn Clock>);

    for user_id in [5, 6, 5] {
        clock.advance(Duration::seconds(1));
        store
            .create_booking(profile_for(user_id), appointment_for(user_id))
            .await
            .unwrap();
    }

    let mine = store.list_by_patient(5).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine[0].created_at > mine[1].created_at);

    let recent = store.list_recent(2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, 3);
    assert_eq!(recent[1].id, 2);
}

#[tokio::test]
async fn count_by_status_tracks_transitions() {
    let store = MemoryStore::new(test_clock());

    for user_id in 1..=3 {
        store
            .create_booking(profile_for(user_id), appointment_for(user_id))
            .await
            .unwrap();
    }
    store
        .update_status(2, AppointmentStatus::Cancelled)
        .await
        .unwrap();

    assert_eq!(store.count_appointments().await.unwrap(), 3);
    assert_eq!(
        store
            .count_by_status(AppointmentStatus::Booked)
            .await
            .unwrap(),
        2
    );
    assert_eq!(
        store
            .count_by_status(AppointmentStatus::Cancelled)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        store
            .count_by_status(AppointmentStatus::Completed)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn second_booking_overwrites_the_profile() {
    let store = MemoryStore::new(test_clock());

    store
        .create_booking(profile_for(1), appointment_for(1))
        .await
        .unwrap();

    let mut updated = profile_for(1);
    updated.name = "Renamed Patient".to_string();
    updated.age = Some(41);
    store
        .create_booking(updated, appointment_for(1))
        .await
        .unwrap();

    let profile = store.find_profile(1).await.unwrap().unwrap();
    assert_eq!(profile.name, "Renamed Patient");
    assert_eq!(profile.age, Some(41));
}

use tracing::info;

use shared_database::memory::MemoryStore;
use shared_models::domain::{Doctor, Hospital, User};

/// Minimal directory so the service answers real requests out of the box.
/// The full directory CRUD surface lives outside this core.
pub async fn seed_demo_directory(store: &MemoryStore) {
    store
        .insert_hospital(Hospital {
            id: 1,
            name: "City General Hospital".to_string(),
            city: "Mumbai".to_string(),
        })
        .await;
    store
        .insert_hospital(Hospital {
            id: 2,
            name: "Lakeside Medical Center".to_string(),
            city: "Pune".to_string(),
        })
        .await;

    store
        .insert_doctor(Doctor {
            id: 1,
            name: "Dr. Asha Verma".to_string(),
            specialization: "Cardiology".to_string(),
            hospital_id: Some(1),
        })
        .await;
    store
        .insert_doctor(Doctor {
            id: 2,
            name: "Dr. Rohan Iyer".to_string(),
            specialization: "Dermatology".to_string(),
            hospital_id: Some(1),
        })
        .await;
    store
        .insert_doctor(Doctor {
            id: 3,
            name: "Dr. Meera Nair".to_string(),
            specialization: "Pediatrics".to_string(),
            hospital_id: Some(2),
        })
        .await;

    store
        .insert_user(User {
            id: 1,
            name: "Demo Patient".to_string(),
            email: "patient@example.com".to_string(),
        })
        .await;

    info!("Seeded demo directory: 2 hospitals, 3 doctors, 1 user");
}

use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::portfolio::model::{HostelGender, PaymentStatus, SharingType};
use crate::portfolio::service::{
    NewHostel, NewOwner, NewRoom, NewStudent, PaymentEntry, PortfolioService,
};
use crate::portfolio::store::{InMemoryOwnerRepository, OwnerRepository, StoreError};

pub(super) const OWNER: &str = "owner-1";

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// The reference evaluation date used throughout these tests.
pub(super) fn today() -> NaiveDate {
    date(2025, 1, 20)
}

pub(super) fn build_service() -> Arc<PortfolioService<InMemoryOwnerRepository>> {
    Arc::new(PortfolioService::new(Arc::new(
        InMemoryOwnerRepository::default(),
    )))
}

pub(super) struct SeededPortfolio {
    pub(super) service: Arc<PortfolioService<InMemoryOwnerRepository>>,
    pub(super) hostel_id: String,
    pub(super) room_101: String,
    pub(super) room_102: String,
    pub(super) amit: String,
    pub(super) preeti: String,
}

/// One hostel, two rooms (double + single), two active students in the
/// double. Amit has settled January; Preeti has not.
pub(super) fn seeded_portfolio() -> SeededPortfolio {
    let service = build_service();

    service
        .register_owner(
            OWNER,
            NewOwner {
                full_name: "Ravi Kumar".to_string(),
                email: "ravi@example.com".to_string(),
                phone: "9876543210".to_string(),
            },
            date(2024, 1, 1),
        )
        .expect("owner registered");

    let hostel_id = service
        .register_hostel(
            OWNER,
            NewHostel {
                name: "Shanti PG".to_string(),
                location: "Indiranagar".to_string(),
                gender: HostelGender::Coliving,
            },
            date(2024, 1, 1),
        )
        .expect("hostel registered");

    let room_101 = service
        .register_room(
            OWNER,
            &hostel_id,
            NewRoom {
                room_number: "101".to_string(),
                capacity: Some(2),
                sharing_type: SharingType::Double,
            },
        )
        .expect("room 101 registered");
    let room_102 = service
        .register_room(
            OWNER,
            &hostel_id,
            NewRoom {
                room_number: "102".to_string(),
                capacity: None,
                sharing_type: SharingType::Single,
            },
        )
        .expect("room 102 registered");

    let amit = service
        .register_student(
            OWNER,
            &hostel_id,
            NewStudent {
                full_name: "Amit Verma".to_string(),
                phone: "9000000001".to_string(),
                room_id: room_101.clone(),
                join_date: "2024-11-05".to_string(),
                fee_amount: 6000.0,
            },
        )
        .expect("Amit registered");
    let preeti = service
        .register_student(
            OWNER,
            &hostel_id,
            NewStudent {
                full_name: "Preeti Singh".to_string(),
                phone: "9000000002".to_string(),
                room_id: room_101.clone(),
                join_date: "2024-12-01".to_string(),
                fee_amount: 4500.0,
            },
        )
        .expect("Preeti registered");

    service
        .record_payment(
            OWNER,
            &hostel_id,
            &amit,
            PaymentEntry {
                month: "2025-01".to_string(),
                amount: 6000.0,
                due_amount: 0.0,
                status: PaymentStatus::Paid,
                paid_date: None,
                remarks: String::new(),
            },
            date(2025, 1, 5),
        )
        .expect("Amit's January recorded");

    SeededPortfolio {
        service,
        hostel_id,
        room_101,
        room_102,
        amit,
        preeti,
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Store double that fails every call, for exercising degraded paths.
pub(super) struct UnavailableStore;

impl OwnerRepository for UnavailableStore {
    fn owner_snapshot(
        &self,
        _owner_id: &str,
    ) -> Result<Option<crate::portfolio::model::Owner>, StoreError> {
        Err(StoreError::Unavailable("document store offline".to_string()))
    }

    fn create_owner(
        &self,
        _owner_id: &str,
        _owner: crate::portfolio::model::Owner,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("document store offline".to_string()))
    }

    fn create_hostel(
        &self,
        _owner_id: &str,
        _hostel_id: &str,
        _hostel: crate::portfolio::model::Hostel,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("document store offline".to_string()))
    }

    fn create_room(
        &self,
        _owner_id: &str,
        _hostel_id: &str,
        _room_id: &str,
        _room: crate::portfolio::model::Room,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("document store offline".to_string()))
    }

    fn create_student(
        &self,
        _owner_id: &str,
        _hostel_id: &str,
        _student_id: &str,
        _student: crate::portfolio::model::Student,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("document store offline".to_string()))
    }

    fn record_payment(
        &self,
        _owner_id: &str,
        _hostel_id: &str,
        _student_id: &str,
        _month: &str,
        _payment: crate::portfolio::model::Payment,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("document store offline".to_string()))
    }

    fn vacate_student(
        &self,
        _owner_id: &str,
        _hostel_id: &str,
        _student_id: &str,
        _leave_date: &str,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("document store offline".to_string()))
    }

    fn record_activity(
        &self,
        _owner_id: &str,
        _activity: crate::portfolio::model::RecentActivity,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("document store offline".to_string()))
    }

    fn list_activities(
        &self,
        _owner_id: &str,
        _max: usize,
    ) -> Result<Vec<crate::portfolio::model::RecentActivity>, StoreError> {
        Err(StoreError::Unavailable("document store offline".to_string()))
    }
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use super::billing::{parse_iso_date, parse_month_key};
use super::finance::HostelScope;
use super::model::{
    Hostel, HostelGender, Owner, Payment, PaymentStatus, RecentActivity, Room, SharingType,
    Student,
};
use super::occupancy::OccupancyReport;
use super::report::views::OccupancyView;
use super::report::{due_students, vacated_students, DashboardSummary, DueStudentView,
    VacatedStudentView};
use super::store::{OwnerRepository, StoreError};

/// Validation + orchestration over the owner document store.
///
/// All evaluation/entry dates are injected by the caller; the service never
/// consults the wall clock, so reports and tests stay reproducible.
pub struct PortfolioService<S> {
    store: Arc<S>,
    activity_feed_limit: usize,
}

/// Feed length served when a caller does not ask for a specific `max`.
const DEFAULT_ACTIVITY_FEED_LIMIT: usize = 10;

static DOCUMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_document_id(kind: &str) -> String {
    let id = DOCUMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{kind}-{id:06}")
}

/// Profile payload captured at sign-up.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOwner {
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Registration payload for a new hostel.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHostel {
    pub name: String,
    #[serde(default)]
    pub location: String,
    pub gender: HostelGender,
}

/// Registration payload for a new room. A missing capacity falls back to the
/// sharing type's default.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoom {
    pub room_number: String,
    #[serde(default)]
    pub capacity: Option<u32>,
    pub sharing_type: SharingType,
}

/// Registration payload for a new student.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    pub room_id: String,
    pub join_date: String,
    #[serde(default)]
    pub fee_amount: f64,
}

/// One month's rent entry as submitted by the collection flow.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEntry {
    pub month: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub due_amount: f64,
    pub status: PaymentStatus,
    #[serde(default)]
    pub paid_date: Option<String>,
    #[serde(default)]
    pub remarks: String,
}

/// Error raised by the portfolio service.
#[derive(Debug, thiserror::Error)]
pub enum PortfolioError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("room {0} does not exist in this hostel")]
    UnknownRoom(String),
    #[error("room {room_number} is at capacity ({capacity})")]
    RoomFull { room_number: String, capacity: u32 },
    #[error("room number {0} is already taken in this hostel")]
    DuplicateRoomNumber(String),
    #[error("capacity must be a positive integer")]
    InvalidCapacity,
    #[error("fee amount must be non-negative")]
    NegativeFee,
    #[error("'{0}' is not a valid ISO-8601 date")]
    InvalidDate(String),
    #[error("'{0}' is not a valid billing month (expected YYYY-MM)")]
    InvalidMonthKey(String),
    #[error("student is already vacated")]
    AlreadyVacated,
}

impl<S> PortfolioService<S>
where
    S: OwnerRepository + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            activity_feed_limit: DEFAULT_ACTIVITY_FEED_LIMIT,
        }
    }

    /// Override the default activity-feed length (configured via
    /// `APP_ACTIVITY_FEED_LIMIT` in the service binary).
    pub fn with_activity_feed_limit(mut self, limit: usize) -> Self {
        self.activity_feed_limit = limit;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn snapshot(&self, owner_id: &str) -> Result<Owner, PortfolioError> {
        Ok(self
            .store
            .owner_snapshot(owner_id)?
            .ok_or(StoreError::OwnerNotFound)?)
    }

    /// Dashboard stat cards for the scope as of `today`.
    pub fn dashboard(
        &self,
        owner_id: &str,
        scope: &HostelScope,
        today: NaiveDate,
    ) -> Result<DashboardSummary, PortfolioError> {
        let owner = self.snapshot(owner_id)?;
        Ok(DashboardSummary::compute(&owner, scope, today))
    }

    /// Per-room fill state for one hostel.
    pub fn occupancy(&self, owner_id: &str, hostel_id: &str) -> Result<OccupancyView, PortfolioError> {
        let owner = self.snapshot(owner_id)?;
        let hostel = owner
            .hostels
            .get(hostel_id)
            .ok_or(StoreError::HostelNotFound)?;
        let report = OccupancyReport::for_hostel(hostel);
        Ok(OccupancyView {
            hostel_id: hostel_id.to_string(),
            hostel_name: hostel.name.clone(),
            vacant_rooms: report.vacant_rooms,
            rooms: report.summary(hostel),
        })
    }

    /// Students unpaid for the current month, due-date order.
    pub fn due_students(
        &self,
        owner_id: &str,
        scope: &HostelScope,
        today: NaiveDate,
    ) -> Result<Vec<DueStudentView>, PortfolioError> {
        let owner = self.snapshot(owner_id)?;
        Ok(due_students(&owner, scope, today))
    }

    /// Vacated-student history rows.
    pub fn vacated_students(
        &self,
        owner_id: &str,
        scope: &HostelScope,
    ) -> Result<Vec<VacatedStudentView>, PortfolioError> {
        let owner = self.snapshot(owner_id)?;
        Ok(vacated_students(&owner, scope))
    }

    pub fn recent_activities(
        &self,
        owner_id: &str,
        max: Option<usize>,
    ) -> Result<Vec<RecentActivity>, PortfolioError> {
        let max = max.unwrap_or(self.activity_feed_limit);
        Ok(self.store.list_activities(owner_id, max)?)
    }

    /// Materialize the owner document normally created by the sign-up flow.
    pub fn register_owner(
        &self,
        owner_id: &str,
        new_owner: NewOwner,
        created_on: NaiveDate,
    ) -> Result<(), PortfolioError> {
        let owner = Owner {
            full_name: new_owner.full_name,
            email: new_owner.email,
            phone: new_owner.phone,
            created_at: created_on.to_string(),
            hostels: Default::default(),
        };
        self.store.create_owner(owner_id, owner)?;
        info!(%owner_id, "owner registered");
        Ok(())
    }

    pub fn register_hostel(
        &self,
        owner_id: &str,
        new_hostel: NewHostel,
        created_on: NaiveDate,
    ) -> Result<String, PortfolioError> {
        let hostel_id = next_document_id("hostel");
        let hostel = Hostel {
            name: new_hostel.name,
            location: new_hostel.location,
            gender: new_hostel.gender,
            created_at: created_on.to_string(),
            is_active: true,
            rooms: Default::default(),
            students: Default::default(),
        };
        self.store.create_hostel(owner_id, &hostel_id, hostel)?;
        info!(%owner_id, %hostel_id, "hostel registered");
        Ok(hostel_id)
    }

    pub fn register_room(
        &self,
        owner_id: &str,
        hostel_id: &str,
        new_room: NewRoom,
    ) -> Result<String, PortfolioError> {
        let capacity = new_room
            .capacity
            .or_else(|| new_room.sharing_type.default_capacity())
            .ok_or(PortfolioError::InvalidCapacity)?;
        if capacity == 0 {
            return Err(PortfolioError::InvalidCapacity);
        }

        let owner = self.snapshot(owner_id)?;
        let hostel = owner
            .hostels
            .get(hostel_id)
            .ok_or(StoreError::HostelNotFound)?;
        if hostel
            .rooms
            .values()
            .any(|room| room.room_number == new_room.room_number)
        {
            return Err(PortfolioError::DuplicateRoomNumber(new_room.room_number));
        }

        let room_id = next_document_id("room");
        let room = Room {
            room_number: new_room.room_number,
            capacity,
            sharing_type: new_room.sharing_type,
        };
        self.store.create_room(owner_id, hostel_id, &room_id, room)?;
        info!(%owner_id, %hostel_id, %room_id, "room registered");
        Ok(room_id)
    }

    /// Register a student into an existing room. The room reference is a
    /// validated foreign key here; the read-side aggregators stay tolerant
    /// of legacy documents that predate this check.
    pub fn register_student(
        &self,
        owner_id: &str,
        hostel_id: &str,
        new_student: NewStudent,
    ) -> Result<String, PortfolioError> {
        if new_student.fee_amount < 0.0 {
            return Err(PortfolioError::NegativeFee);
        }
        let Some(join) = parse_iso_date(&new_student.join_date) else {
            return Err(PortfolioError::InvalidDate(new_student.join_date));
        };

        let owner = self.snapshot(owner_id)?;
        let hostel = owner
            .hostels
            .get(hostel_id)
            .ok_or(StoreError::HostelNotFound)?;
        let room = hostel
            .rooms
            .get(&new_student.room_id)
            .ok_or_else(|| PortfolioError::UnknownRoom(new_student.room_id.clone()))?;

        let report = OccupancyReport::for_hostel(hostel);
        if report
            .room_fill
            .get(&new_student.room_id)
            .is_some_and(|fill| fill.is_full)
        {
            return Err(PortfolioError::RoomFull {
                room_number: room.room_number.clone(),
                capacity: room.capacity,
            });
        }

        let student_id = next_document_id("student");
        let student = Student {
            full_name: new_student.full_name.clone(),
            phone: new_student.phone,
            room_id: new_student.room_id,
            join_date: join.to_string(),
            leave_date: None,
            fee_amount: new_student.fee_amount,
            is_active: true,
            payments: Default::default(),
        };
        self.store
            .create_student(owner_id, hostel_id, &student_id, student)?;
        info!(%owner_id, %hostel_id, %student_id, "student registered");

        self.store.record_activity(
            owner_id,
            RecentActivity {
                text: format!("{} joined {}", new_student.full_name, hostel.name),
                icon: "join".to_string(),
                created_at: join.to_string(),
            },
        )?;

        Ok(student_id)
    }

    /// Record (or correct) one month's rent entry. Paid entries without an
    /// explicit paid date are stamped with `recorded_on`.
    pub fn record_payment(
        &self,
        owner_id: &str,
        hostel_id: &str,
        student_id: &str,
        entry: PaymentEntry,
        recorded_on: NaiveDate,
    ) -> Result<(), PortfolioError> {
        if parse_month_key(&entry.month).is_none() {
            return Err(PortfolioError::InvalidMonthKey(entry.month));
        }

        let owner = self.snapshot(owner_id)?;
        let hostel = owner
            .hostels
            .get(hostel_id)
            .ok_or(StoreError::HostelNotFound)?;
        let student = hostel
            .students
            .get(student_id)
            .ok_or(StoreError::StudentNotFound)?;

        let paid_date = match entry.status {
            PaymentStatus::Paid => entry.paid_date.or_else(|| Some(recorded_on.to_string())),
            PaymentStatus::Unpaid => None,
        };
        let payment = Payment {
            amount: entry.amount,
            due_amount: entry.due_amount,
            status: entry.status,
            paid_date,
            remarks: entry.remarks,
        };

        self.store
            .record_payment(owner_id, hostel_id, student_id, &entry.month, payment)?;
        info!(%owner_id, %hostel_id, %student_id, month = %entry.month, "payment recorded");

        if entry.status == PaymentStatus::Paid {
            let room_number = hostel
                .rooms
                .get(&student.room_id)
                .map(|room| room.room_number.clone())
                .unwrap_or_else(|| student.room_id.clone());
            self.store.record_activity(
                owner_id,
                RecentActivity {
                    text: format!(
                        "{} paid {} for room {}",
                        student.full_name, entry.amount, room_number
                    ),
                    icon: "payment".to_string(),
                    created_at: recorded_on.to_string(),
                },
            )?;
        }

        Ok(())
    }

    /// Deactivate a student. The leave date is mandatory here so the
    /// `isActive=false ⇒ leaveDate` invariant holds for everything this
    /// service writes.
    pub fn vacate_student(
        &self,
        owner_id: &str,
        hostel_id: &str,
        student_id: &str,
        leave_date: NaiveDate,
    ) -> Result<(), PortfolioError> {
        let owner = self.snapshot(owner_id)?;
        let hostel = owner
            .hostels
            .get(hostel_id)
            .ok_or(StoreError::HostelNotFound)?;
        let student = hostel
            .students
            .get(student_id)
            .ok_or(StoreError::StudentNotFound)?;
        if !student.is_active {
            return Err(PortfolioError::AlreadyVacated);
        }

        self.store
            .vacate_student(owner_id, hostel_id, student_id, &leave_date.to_string())?;
        info!(%owner_id, %hostel_id, %student_id, "student vacated");

        let room_number = hostel
            .rooms
            .get(&student.room_id)
            .map(|room| room.room_number.clone())
            .unwrap_or_else(|| student.room_id.clone());
        self.store.record_activity(
            owner_id,
            RecentActivity {
                text: format!("{} vacated room {}", student.full_name, room_number),
                icon: "leave".to_string(),
                created_at: leave_date.to_string(),
            },
        )?;

        Ok(())
    }
}

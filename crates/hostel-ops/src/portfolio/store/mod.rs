//! The document-store collaborator boundary.
//!
//! Production deployments back this with a real document database; the
//! in-memory implementation ships for the service binary, demos, and tests.

mod memory;

pub use memory::InMemoryOwnerRepository;

use super::model::{Hostel, Owner, Payment, RecentActivity, Room, Student};

/// Storage abstraction over the owner document tree.
///
/// Reads are point-in-time snapshots; writes mutate one document path at a
/// time, mirroring the update granularity of the original document store.
pub trait OwnerRepository: Send + Sync {
    fn owner_snapshot(&self, owner_id: &str) -> Result<Option<Owner>, StoreError>;

    fn create_owner(&self, owner_id: &str, owner: Owner) -> Result<(), StoreError>;

    fn create_hostel(&self, owner_id: &str, hostel_id: &str, hostel: Hostel)
        -> Result<(), StoreError>;

    fn create_room(
        &self,
        owner_id: &str,
        hostel_id: &str,
        room_id: &str,
        room: Room,
    ) -> Result<(), StoreError>;

    fn create_student(
        &self,
        owner_id: &str,
        hostel_id: &str,
        student_id: &str,
        student: Student,
    ) -> Result<(), StoreError>;

    /// Upsert one month's payment record; the month key is the map key, so a
    /// student can never hold two records for the same month.
    fn record_payment(
        &self,
        owner_id: &str,
        hostel_id: &str,
        student_id: &str,
        month: &str,
        payment: Payment,
    ) -> Result<(), StoreError>;

    /// Deactivate a student and stamp their leave date.
    fn vacate_student(
        &self,
        owner_id: &str,
        hostel_id: &str,
        student_id: &str,
        leave_date: &str,
    ) -> Result<(), StoreError>;

    fn record_activity(&self, owner_id: &str, activity: RecentActivity) -> Result<(), StoreError>;

    /// Newest-first activity feed, truncated to `max` entries.
    fn list_activities(&self, owner_id: &str, max: usize)
        -> Result<Vec<RecentActivity>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("owner not found")]
    OwnerNotFound,
    #[error("hostel not found")]
    HostelNotFound,
    #[error("room not found")]
    RoomNotFound,
    #[error("student not found")]
    StudentNotFound,
    #[error("record already exists")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

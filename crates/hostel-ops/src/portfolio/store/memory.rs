use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::super::model::{Hostel, Owner, Payment, RecentActivity, Room, Student};
use super::{OwnerRepository, StoreError};

#[derive(Debug, Default, Clone)]
struct OwnerRecord {
    owner: Owner,
    activities: Vec<RecentActivity>,
}

/// Mutex-guarded owner map. Good enough for a single process; everything the
/// rest of the crate needs from a document store.
#[derive(Default, Clone)]
pub struct InMemoryOwnerRepository {
    records: Arc<Mutex<HashMap<String, OwnerRecord>>>,
}

impl InMemoryOwnerRepository {
    fn with_record<T>(
        &self,
        owner_id: &str,
        f: impl FnOnce(&mut OwnerRecord) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        let record = guard.get_mut(owner_id).ok_or(StoreError::OwnerNotFound)?;
        f(record)
    }

    fn with_student<T>(
        &self,
        owner_id: &str,
        hostel_id: &str,
        student_id: &str,
        f: impl FnOnce(&mut Student) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        self.with_record(owner_id, |record| {
            let hostel = record
                .owner
                .hostels
                .get_mut(hostel_id)
                .ok_or(StoreError::HostelNotFound)?;
            let student = hostel
                .students
                .get_mut(student_id)
                .ok_or(StoreError::StudentNotFound)?;
            f(student)
        })
    }
}

impl OwnerRepository for InMemoryOwnerRepository {
    fn owner_snapshot(&self, owner_id: &str) -> Result<Option<Owner>, StoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        Ok(guard.get(owner_id).map(|record| record.owner.clone()))
    }

    fn create_owner(&self, owner_id: &str, owner: Owner) -> Result<(), StoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        if guard.contains_key(owner_id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(
            owner_id.to_string(),
            OwnerRecord {
                owner,
                activities: Vec::new(),
            },
        );
        Ok(())
    }

    fn create_hostel(
        &self,
        owner_id: &str,
        hostel_id: &str,
        hostel: Hostel,
    ) -> Result<(), StoreError> {
        self.with_record(owner_id, |record| {
            if record.owner.hostels.contains_key(hostel_id) {
                return Err(StoreError::Conflict);
            }
            record.owner.hostels.insert(hostel_id.to_string(), hostel);
            Ok(())
        })
    }

    fn create_room(
        &self,
        owner_id: &str,
        hostel_id: &str,
        room_id: &str,
        room: Room,
    ) -> Result<(), StoreError> {
        self.with_record(owner_id, |record| {
            let hostel = record
                .owner
                .hostels
                .get_mut(hostel_id)
                .ok_or(StoreError::HostelNotFound)?;
            if hostel.rooms.contains_key(room_id) {
                return Err(StoreError::Conflict);
            }
            hostel.rooms.insert(room_id.to_string(), room);
            Ok(())
        })
    }

    fn create_student(
        &self,
        owner_id: &str,
        hostel_id: &str,
        student_id: &str,
        student: Student,
    ) -> Result<(), StoreError> {
        self.with_record(owner_id, |record| {
            let hostel = record
                .owner
                .hostels
                .get_mut(hostel_id)
                .ok_or(StoreError::HostelNotFound)?;
            if hostel.students.contains_key(student_id) {
                return Err(StoreError::Conflict);
            }
            hostel.students.insert(student_id.to_string(), student);
            Ok(())
        })
    }

    fn record_payment(
        &self,
        owner_id: &str,
        hostel_id: &str,
        student_id: &str,
        month: &str,
        payment: Payment,
    ) -> Result<(), StoreError> {
        self.with_student(owner_id, hostel_id, student_id, |student| {
            student.payments.insert(month.to_string(), payment);
            Ok(())
        })
    }

    fn vacate_student(
        &self,
        owner_id: &str,
        hostel_id: &str,
        student_id: &str,
        leave_date: &str,
    ) -> Result<(), StoreError> {
        self.with_student(owner_id, hostel_id, student_id, |student| {
            student.is_active = false;
            student.leave_date = Some(leave_date.to_string());
            Ok(())
        })
    }

    fn record_activity(&self, owner_id: &str, activity: RecentActivity) -> Result<(), StoreError> {
        self.with_record(owner_id, |record| {
            record.activities.push(activity);
            Ok(())
        })
    }

    fn list_activities(
        &self,
        owner_id: &str,
        max: usize,
    ) -> Result<Vec<RecentActivity>, StoreError> {
        self.with_record(owner_id, |record| {
            let mut activities = record.activities.clone();
            // ISO timestamps sort lexicographically, newest first after reverse.
            activities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            activities.truncate(max);
            Ok(activities)
        })
    }
}

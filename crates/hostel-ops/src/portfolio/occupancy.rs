//! Room vacancy derived from the active roster.

use std::collections::BTreeMap;

use serde::Serialize;

use super::model::Hostel;

/// Fill state of a single room.
///
/// `occupied` is the raw count of active students referencing the room; it is
/// reported as-is even when it exceeds `capacity` (capacity is enforced on
/// the write path, not here).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomFill {
    pub occupied: usize,
    pub capacity: u32,
    pub is_full: bool,
}

/// Per-room fill entry ordered for display surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomFillEntry {
    pub room_id: String,
    pub room_number: String,
    pub occupied: usize,
    pub capacity: u32,
    pub is_full: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyReport {
    pub vacant_rooms: usize,
    pub room_fill: BTreeMap<String, RoomFill>,
}

impl OccupancyReport {
    /// Compute vacancy for one hostel. Active students whose `roomId` does
    /// not resolve to a room are skipped; a room with no students is
    /// trivially vacant.
    pub fn for_hostel(hostel: &Hostel) -> Self {
        let mut occupied_by_room: BTreeMap<&str, usize> = BTreeMap::new();
        for (_, student) in hostel.active_students() {
            if hostel.rooms.contains_key(&student.room_id) {
                *occupied_by_room.entry(student.room_id.as_str()).or_default() += 1;
            }
        }

        let mut report = Self::default();
        for (room_id, room) in &hostel.rooms {
            let occupied = occupied_by_room.get(room_id.as_str()).copied().unwrap_or(0);
            let is_full = occupied >= room.capacity as usize;
            if !is_full {
                report.vacant_rooms += 1;
            }
            report.room_fill.insert(
                room_id.clone(),
                RoomFill {
                    occupied,
                    capacity: room.capacity,
                    is_full,
                },
            );
        }

        report
    }

    /// Ordered per-room entries with display labels, keyed back to the
    /// hostel for room numbers.
    pub fn summary(&self, hostel: &Hostel) -> Vec<RoomFillEntry> {
        self.room_fill
            .iter()
            .map(|(room_id, fill)| RoomFillEntry {
                room_id: room_id.clone(),
                room_number: hostel
                    .rooms
                    .get(room_id)
                    .map(|room| room.room_number.clone())
                    .unwrap_or_else(|| room_id.clone()),
                occupied: fill.occupied,
                capacity: fill.capacity,
                is_full: fill.is_full,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::portfolio::model::{HostelGender, Room, SharingType, Student};

    fn room(number: &str, capacity: u32) -> Room {
        Room {
            room_number: number.to_string(),
            capacity,
            sharing_type: SharingType::Double,
        }
    }

    fn student(room_id: &str, active: bool) -> Student {
        Student {
            full_name: "Student".to_string(),
            phone: String::new(),
            room_id: room_id.to_string(),
            join_date: "2025-01-01".to_string(),
            leave_date: if active {
                None
            } else {
                Some("2025-02-01".to_string())
            },
            fee_amount: 5000.0,
            is_active: active,
            payments: BTreeMap::new(),
        }
    }

    fn hostel(rooms: Vec<(&str, Room)>, students: Vec<(&str, Student)>) -> Hostel {
        Hostel {
            name: "Shanti PG".to_string(),
            location: String::new(),
            gender: HostelGender::Coliving,
            created_at: "2024-01-01".to_string(),
            is_active: true,
            rooms: rooms
                .into_iter()
                .map(|(id, room)| (id.to_string(), room))
                .collect(),
            students: students
                .into_iter()
                .map(|(id, student)| (id.to_string(), student))
                .collect(),
        }
    }

    #[test]
    fn full_room_excludes_inactive_students() {
        let hostel = hostel(
            vec![("room-101", room("101", 2))],
            vec![
                ("student-1", student("room-101", true)),
                ("student-2", student("room-101", true)),
                ("student-3", student("room-101", false)),
            ],
        );

        let report = OccupancyReport::for_hostel(&hostel);
        let fill = report.room_fill.get("room-101").expect("room reported");
        assert_eq!(fill.occupied, 2);
        assert!(fill.is_full);
        assert_eq!(report.vacant_rooms, 0);
    }

    #[test]
    fn empty_room_is_trivially_vacant() {
        let hostel = hostel(vec![("room-101", room("101", 3))], vec![]);
        let report = OccupancyReport::for_hostel(&hostel);
        let fill = report.room_fill.get("room-101").expect("room reported");
        assert_eq!(fill.occupied, 0);
        assert!(!fill.is_full);
        assert_eq!(report.vacant_rooms, 1);
    }

    #[test]
    fn overflow_is_reported_as_is() {
        let hostel = hostel(
            vec![("room-101", room("101", 1))],
            vec![
                ("student-1", student("room-101", true)),
                ("student-2", student("room-101", true)),
            ],
        );

        let report = OccupancyReport::for_hostel(&hostel);
        let fill = report.room_fill.get("room-101").expect("room reported");
        assert_eq!(fill.occupied, 2, "raw count survives past capacity");
        assert!(fill.is_full);
    }

    #[test]
    fn dangling_room_references_are_skipped() {
        let hostel = hostel(
            vec![("room-101", room("101", 2))],
            vec![
                ("student-1", student("room-101", true)),
                ("student-2", student("room-999", true)),
            ],
        );

        let report = OccupancyReport::for_hostel(&hostel);
        assert_eq!(report.room_fill.len(), 1);
        assert_eq!(
            report.room_fill.get("room-101").expect("room reported").occupied,
            1
        );
        assert_eq!(report.vacant_rooms, 1);
    }

    #[test]
    fn summary_carries_room_numbers() {
        let hostel = hostel(
            vec![("room-a", room("101", 2)), ("room-b", room("102", 1))],
            vec![("student-1", student("room-b", true))],
        );

        let report = OccupancyReport::for_hostel(&hostel);
        let entries = report.summary(&hostel);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].room_number, "101");
        assert!(entries[1].is_full);
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Gender designation advertised for a hostel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostelGender {
    Gents,
    Ladies,
    Coliving,
}

impl HostelGender {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gents => "Gents",
            Self::Ladies => "Ladies",
            Self::Coliving => "Co-living",
        }
    }
}

/// Sharing arrangement of a room. Drives the default capacity when a room is
/// registered without one; it never enforces occupancy on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharingType {
    Single,
    Double,
    Triple,
    Quad,
    Quint,
    Other,
}

impl SharingType {
    pub const fn default_capacity(self) -> Option<u32> {
        match self {
            Self::Single => Some(1),
            Self::Double => Some(2),
            Self::Triple => Some(3),
            Self::Quad => Some(4),
            Self::Quint => Some(5),
            Self::Other => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Double => "Double",
            Self::Triple => "Triple",
            Self::Quad => "Quad",
            Self::Quint => "Quint",
            Self::Other => "Other",
        }
    }
}

/// Settlement state of one billing month, and the classification the billing
/// rules produce for a student as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Unpaid => "Unpaid",
        }
    }
}

/// One month's rent record, keyed in `Student::payments` by `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
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

/// A tenant occupying (or formerly occupying) a room.
///
/// `join_date` stays a raw string: legacy documents carry values that do not
/// parse, and the billing rules tolerate them rather than failing
/// deserialization of the whole owner tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    pub room_id: String,
    pub join_date: String,
    #[serde(default)]
    pub leave_date: Option<String>,
    #[serde(default)]
    pub fee_amount: f64,
    pub is_active: bool,
    #[serde(default)]
    pub payments: BTreeMap<String, Payment>,
}

/// A physical unit within a hostel. Fill state is derived from the active
/// roster, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub room_number: String,
    #[serde(default)]
    pub capacity: u32,
    pub sharing_type: SharingType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hostel {
    pub name: String,
    #[serde(default)]
    pub location: String,
    pub gender: HostelGender,
    pub created_at: String,
    pub is_active: bool,
    #[serde(default)]
    pub rooms: BTreeMap<String, Room>,
    #[serde(default)]
    pub students: BTreeMap<String, Student>,
}

impl Hostel {
    /// Students currently on the roster, with their document ids.
    pub fn active_students(&self) -> impl Iterator<Item = (&str, &Student)> {
        self.students
            .iter()
            .filter(|(_, student)| student.is_active)
            .map(|(id, student)| (id.as_str(), student))
    }
}

/// Top-level tenant document: one owner, their hostels, and profile fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub created_at: String,
    #[serde(default)]
    pub hostels: BTreeMap<String, Hostel>,
}

/// Owner-level activity feed entry ("Amit paid 6000 for room 102").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub text: String,
    pub icon: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_document_uses_camel_case_and_zero_fills_numerics() {
        let raw = r#"{
            "fullName": "Amit Verma",
            "roomId": "room-101",
            "joinDate": "2025-01-15",
            "isActive": true,
            "payments": {
                "2025-02": { "amount": 6000, "dueAmount": 0, "status": "paid", "paidDate": "2025-02-03", "remarks": "" }
            }
        }"#;

        let student: Student = serde_json::from_str(raw).expect("document deserializes");
        assert_eq!(student.full_name, "Amit Verma");
        assert_eq!(student.fee_amount, 0.0, "missing feeAmount defaults to 0");
        assert_eq!(student.phone, "");
        assert!(student.leave_date.is_none());

        let payment = student.payments.get("2025-02").expect("payment present");
        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(payment.paid_date.as_deref(), Some("2025-02-03"));
    }

    #[test]
    fn malformed_join_date_survives_deserialization() {
        let raw = r#"{
            "fullName": "Preeti",
            "roomId": "room-202",
            "joinDate": "not-a-date",
            "feeAmount": 4500,
            "isActive": true
        }"#;

        let student: Student = serde_json::from_str(raw).expect("document deserializes");
        assert_eq!(student.join_date, "not-a-date");
        assert!(student.payments.is_empty());
    }

    #[test]
    fn sharing_type_drives_default_capacity() {
        assert_eq!(SharingType::Single.default_capacity(), Some(1));
        assert_eq!(SharingType::Quint.default_capacity(), Some(5));
        assert_eq!(SharingType::Other.default_capacity(), None);
    }

    #[test]
    fn room_document_round_trips() {
        let room = Room {
            room_number: "101".to_string(),
            capacity: 2,
            sharing_type: SharingType::Double,
        };

        let json = serde_json::to_value(&room).expect("serializes");
        assert_eq!(json["roomNumber"], "101");
        assert_eq!(json["sharingType"], "double");

        let back: Room = serde_json::from_value(json).expect("deserializes");
        assert_eq!(back, room);
    }

    #[test]
    fn hostel_active_students_excludes_vacated() {
        let mut students = BTreeMap::new();
        students.insert(
            "student-1".to_string(),
            Student {
                full_name: "Ravi".to_string(),
                phone: String::new(),
                room_id: "room-101".to_string(),
                join_date: "2025-01-01".to_string(),
                leave_date: None,
                fee_amount: 6000.0,
                is_active: true,
                payments: BTreeMap::new(),
            },
        );
        students.insert(
            "student-2".to_string(),
            Student {
                full_name: "Asha".to_string(),
                phone: String::new(),
                room_id: "room-101".to_string(),
                join_date: "2024-06-01".to_string(),
                leave_date: Some("2025-01-10".to_string()),
                fee_amount: 6000.0,
                is_active: false,
                payments: BTreeMap::new(),
            },
        );

        let hostel = Hostel {
            name: "Shanti PG".to_string(),
            location: "Indiranagar".to_string(),
            gender: HostelGender::Ladies,
            created_at: "2024-01-01".to_string(),
            is_active: true,
            rooms: BTreeMap::new(),
            students,
        };

        let active: Vec<_> = hostel.active_students().map(|(id, _)| id).collect();
        assert_eq!(active, vec!["student-1"]);
    }
}

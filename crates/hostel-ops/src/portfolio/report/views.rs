use chrono::NaiveDate;
use serde::Serialize;

use super::super::model::PaymentStatus;
use super::super::occupancy::RoomFillEntry;

/// The stat-card block every dashboard surface renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_hostels: usize,
    pub total_students: usize,
    pub amount_collected: f64,
    pub pending_fees: f64,
    pub dues_today: usize,
    pub overdue_payments: usize,
    pub new_joins: usize,
    pub vacant_rooms: usize,
}

/// One row of the due-payments listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueStudentView {
    pub student_id: String,
    pub hostel_id: String,
    pub full_name: String,
    pub phone: String,
    pub room_id: String,
    pub fee_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub status: PaymentStatus,
    pub status_label: &'static str,
}

/// Occupancy block for one hostel's room screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyView {
    pub hostel_id: String,
    pub hostel_name: String,
    pub vacant_rooms: usize,
    pub rooms: Vec<RoomFillEntry>,
}

/// One row of the vacated-students history listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VacatedStudentView {
    pub student_id: String,
    pub hostel_id: String,
    pub full_name: String,
    pub room_id: String,
    pub join_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leave_date: Option<String>,
}

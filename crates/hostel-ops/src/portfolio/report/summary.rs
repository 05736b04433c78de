use chrono::NaiveDate;

use super::super::billing::{next_due_date, parse_iso_date, payment_status};
use super::super::finance::{FinanceTotals, HostelScope};
use super::super::model::{Owner, PaymentStatus};
use super::super::occupancy::OccupancyReport;
use super::views::{DashboardSummary, DueStudentView, VacatedStudentView};

impl DashboardSummary {
    /// Assemble the dashboard numbers for one owner and scope. This is the
    /// single consolidation point; screens must not re-derive their own sums.
    pub fn compute(owner: &Owner, scope: &HostelScope, today: NaiveDate) -> Self {
        let finance = FinanceTotals::for_owner(owner, scope, today);

        let mut total_hostels = 0;
        let mut total_students = 0;
        let mut vacant_rooms = 0;
        for (hostel_id, hostel) in &owner.hostels {
            if !scope.includes(hostel_id) {
                continue;
            }
            total_hostels += 1;
            total_students += hostel.active_students().count();
            vacant_rooms += OccupancyReport::for_hostel(hostel).vacant_rooms;
        }

        Self {
            total_hostels,
            total_students,
            amount_collected: finance.amount_collected,
            pending_fees: finance.pending_fees,
            dues_today: finance.dues_today,
            overdue_payments: finance.overdue_payments,
            new_joins: finance.new_joins,
            vacant_rooms,
        }
    }
}

/// Active students currently `Unpaid` for the month containing `today`,
/// sorted by projected due date then name.
pub fn due_students(owner: &Owner, scope: &HostelScope, today: NaiveDate) -> Vec<DueStudentView> {
    let mut rows: Vec<DueStudentView> = Vec::new();

    for (hostel_id, hostel) in &owner.hostels {
        if !scope.includes(hostel_id) {
            continue;
        }
        for (student_id, student) in hostel.active_students() {
            let status = payment_status(student, today);
            if status != PaymentStatus::Unpaid {
                continue;
            }
            let due_date =
                parse_iso_date(&student.join_date).and_then(|join| next_due_date(join, today));
            rows.push(DueStudentView {
                student_id: student_id.to_string(),
                hostel_id: hostel_id.clone(),
                full_name: student.full_name.clone(),
                phone: student.phone.clone(),
                room_id: student.room_id.clone(),
                fee_amount: student.fee_amount,
                due_date,
                status,
                status_label: status.label(),
            });
        }
    }

    rows.sort_by(|a, b| {
        a.due_date
            .cmp(&b.due_date)
            .then_with(|| a.full_name.cmp(&b.full_name))
    });
    rows
}

/// Vacated students for the history screen, newest leave date first.
pub fn vacated_students(owner: &Owner, scope: &HostelScope) -> Vec<VacatedStudentView> {
    let mut rows: Vec<VacatedStudentView> = Vec::new();

    for (hostel_id, hostel) in &owner.hostels {
        if !scope.includes(hostel_id) {
            continue;
        }
        for (student_id, student) in &hostel.students {
            if student.is_active {
                continue;
            }
            rows.push(VacatedStudentView {
                student_id: student_id.clone(),
                hostel_id: hostel_id.clone(),
                full_name: student.full_name.clone(),
                room_id: student.room_id.clone(),
                join_date: student.join_date.clone(),
                leave_date: student.leave_date.clone(),
            });
        }
    }

    // ISO date strings order lexicographically; missing leave dates sink last.
    rows.sort_by(|a, b| b.leave_date.cmp(&a.leave_date));
    rows
}

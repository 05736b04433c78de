//! Billing-cycle rules: when a student owes rent, and whether the current
//! month is settled.
//!
//! Everything here is a pure function of its arguments; callers inject the
//! evaluation date so reports stay reproducible.

use chrono::{DateTime, Datelike, NaiveDate};

use super::model::{PaymentStatus, Student};

/// Classify a student as `Paid` or `Unpaid` for the billing month containing
/// `today`.
///
/// A join date that does not parse classifies the student as `Paid`. This is
/// the long-standing fail-open behavior for corrupt legacy documents and it
/// can hide genuinely overdue tenants; see DESIGN.md before changing it.
pub fn payment_status(student: &Student, today: NaiveDate) -> PaymentStatus {
    let Some(join) = parse_iso_date(&student.join_date) else {
        return PaymentStatus::Paid;
    };

    // Joined within the current billing month: no dues yet.
    if months_since(join, today) == 0 {
        return PaymentStatus::Paid;
    }

    // Only the current month's record counts; there is no arrears lookback.
    match student.payments.get(&month_key(today)) {
        Some(payment) if payment.status == PaymentStatus::Paid => PaymentStatus::Paid,
        _ => PaymentStatus::Unpaid,
    }
}

/// Whole calendar months elapsed from `join` to `today`. The partial month is
/// not counted until the day-of-month boundary is crossed, so exactly one
/// month and zero days yields 1.
pub fn months_since(join: NaiveDate, today: NaiveDate) -> i32 {
    let mut months =
        (today.year() - join.year()) * 12 + today.month() as i32 - join.month() as i32;
    if today.day() < join.day() {
        months -= 1;
    }
    months
}

/// The `YYYY-MM` key identifying `date`'s billing month.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Parse a `YYYY-MM` month key back into (year, month).
pub fn parse_month_key(raw: &str) -> Option<(i32, u32)> {
    let (year, month) = raw.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    if (1..=12).contains(&month) {
        Some((year, month))
    } else {
        None
    }
}

/// The student's due day projected into the given month, clamped to the
/// month's length (a join on the 31st falls due on Feb 28 in February).
pub fn monthly_due_date(join: NaiveDate, year: i32, month: u32) -> Option<NaiveDate> {
    let day = join.day().min(last_day_of_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

/// The next upcoming due date as of `today`: the current month's projection,
/// rolled into the following month once it has passed.
pub fn next_due_date(join: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let current = monthly_due_date(join, today.year(), today.month())?;
    if current >= today {
        return Some(current);
    }
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    monthly_due_date(join, year, month)
}

/// Lenient ISO-8601 date parsing: accepts a plain date or an RFC 3339
/// timestamp, as the historical documents mix both.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|timestamp| timestamp.date_naive())
}

fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next.and_then(|date| date.pred_opt()).map(|date| date.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::portfolio::model::Payment;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn student(join_date: &str, payments: BTreeMap<String, Payment>) -> Student {
        Student {
            full_name: "Test Student".to_string(),
            phone: String::new(),
            room_id: "room-101".to_string(),
            join_date: join_date.to_string(),
            leave_date: None,
            fee_amount: 5000.0,
            is_active: true,
            payments,
        }
    }

    fn paid_entry() -> Payment {
        Payment {
            amount: 5000.0,
            due_amount: 0.0,
            status: PaymentStatus::Paid,
            paid_date: Some("2025-01-05".to_string()),
            remarks: String::new(),
        }
    }

    fn unpaid_entry() -> Payment {
        Payment {
            amount: 5000.0,
            due_amount: 5000.0,
            status: PaymentStatus::Unpaid,
            paid_date: None,
            remarks: String::new(),
        }
    }

    #[test]
    fn new_joiner_is_paid_regardless_of_payments() {
        // Joined on the 15th, evaluated five days later: still in the grace month.
        let student = student("2025-01-15", BTreeMap::new());
        assert_eq!(
            payment_status(&student, date(2025, 1, 20)),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn unpaid_current_month_classifies_unpaid() {
        let mut payments = BTreeMap::new();
        payments.insert("2025-01".to_string(), unpaid_entry());
        let student = student("2024-11-01", payments);
        assert_eq!(
            payment_status(&student, date(2025, 1, 20)),
            PaymentStatus::Unpaid
        );
    }

    #[test]
    fn only_the_current_month_is_consulted() {
        // December was never settled, but January is; history is not consulted.
        let mut payments = BTreeMap::new();
        payments.insert("2025-01".to_string(), paid_entry());
        let student = student("2024-11-01", payments);
        assert_eq!(
            payment_status(&student, date(2025, 1, 20)),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn missing_payments_map_means_unpaid_after_grace() {
        let student = student("2024-11-01", BTreeMap::new());
        assert_eq!(
            payment_status(&student, date(2025, 1, 20)),
            PaymentStatus::Unpaid
        );
    }

    #[test]
    fn malformed_join_date_fails_open_to_paid() {
        let student_bad = student("not-a-date", BTreeMap::new());
        assert_eq!(
            payment_status(&student_bad, date(2025, 1, 20)),
            PaymentStatus::Paid
        );
        let student_empty = student("", BTreeMap::new());
        assert_eq!(
            payment_status(&student_empty, date(2030, 6, 1)),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn grace_ends_the_instant_the_day_boundary_passes() {
        let join = date(2025, 1, 15);
        assert_eq!(months_since(join, date(2025, 2, 14)), 0);
        assert_eq!(months_since(join, date(2025, 2, 15)), 1);

        // One month and zero days: subject to the current-month lookup.
        let student = student("2025-01-15", BTreeMap::new());
        assert_eq!(
            payment_status(&student, date(2025, 2, 15)),
            PaymentStatus::Unpaid
        );
    }

    #[test]
    fn months_since_handles_short_months_and_year_rollover() {
        assert_eq!(months_since(date(2025, 1, 31), date(2025, 2, 28)), 0);
        assert_eq!(months_since(date(2025, 1, 31), date(2025, 3, 31)), 2);
        assert_eq!(months_since(date(2024, 11, 10), date(2025, 1, 10)), 2);
        assert_eq!(months_since(date(2025, 3, 10), date(2025, 1, 20)), -2);
    }

    #[test]
    fn month_key_formats_and_parses() {
        assert_eq!(month_key(date(2025, 1, 20)), "2025-01");
        assert_eq!(month_key(date(2025, 11, 3)), "2025-11");
        assert_eq!(parse_month_key("2025-01"), Some((2025, 1)));
        assert_eq!(parse_month_key("2025-13"), None);
        assert_eq!(parse_month_key("2025-1"), None);
        assert_eq!(parse_month_key("january"), None);
    }

    #[test]
    fn due_dates_clamp_to_month_length() {
        let join = date(2024, 10, 31);
        assert_eq!(
            monthly_due_date(join, 2025, 2),
            Some(date(2025, 2, 28))
        );
        assert_eq!(
            monthly_due_date(join, 2024, 2),
            Some(date(2024, 2, 29))
        );
    }

    #[test]
    fn next_due_date_rolls_forward_once_passed() {
        let join = date(2024, 11, 15);
        // Before the due day: stays in the current month.
        assert_eq!(next_due_date(join, date(2025, 1, 10)), Some(date(2025, 1, 15)));
        // On the due day: due today.
        assert_eq!(next_due_date(join, date(2025, 1, 15)), Some(date(2025, 1, 15)));
        // After the due day: next month.
        assert_eq!(next_due_date(join, date(2025, 1, 16)), Some(date(2025, 2, 15)));
        // December rolls into January.
        assert_eq!(next_due_date(join, date(2024, 12, 20)), Some(date(2025, 1, 15)));
    }

    #[test]
    fn parse_iso_date_accepts_dates_and_timestamps() {
        assert_eq!(parse_iso_date("2025-01-15"), Some(date(2025, 1, 15)));
        assert_eq!(
            parse_iso_date("2025-01-15T08:30:00Z"),
            Some(date(2025, 1, 15))
        );
        assert_eq!(parse_iso_date(" 2025-01-15 "), Some(date(2025, 1, 15)));
        assert_eq!(parse_iso_date(""), None);
        assert_eq!(parse_iso_date("15/01/2025"), None);
    }
}

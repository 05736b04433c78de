//! Monetary aggregation over a scoped student set.
//!
//! This is the one place the dashboard numbers are computed; every surface
//! (HTTP, CLI, demo) goes through `FinanceTotals` rather than re-deriving
//! its own variant of these sums.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::billing::{monthly_due_date, months_since, parse_iso_date, payment_status};
use super::model::{Owner, PaymentStatus, Student};

/// Trailing window, in calendar days and inclusive of today, that counts a
/// student as a "new join" on the dashboard.
pub const NEW_JOIN_WINDOW_DAYS: i64 = 7;

/// Which hostels participate in an aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostelScope {
    All,
    Hostel(String),
}

impl HostelScope {
    /// Interpret a raw scope parameter; `"all"` (case-insensitive) is the
    /// every-hostel sentinel.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Hostel(trimmed.to_string())
        }
    }

    pub fn includes(&self, hostel_id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Hostel(id) => id == hostel_id,
        }
    }
}

/// Monetary and headcount totals for the selected scope.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceTotals {
    pub amount_collected: f64,
    pub pending_fees: f64,
    pub dues_today: usize,
    pub overdue_payments: usize,
    pub new_joins: usize,
}

impl FinanceTotals {
    /// Aggregate over an owner's hostels map.
    pub fn for_owner(owner: &Owner, scope: &HostelScope, today: NaiveDate) -> Self {
        Self::from_students(
            owner.hostels.iter().flat_map(|(hostel_id, hostel)| {
                hostel
                    .students
                    .values()
                    .map(move |student| (hostel_id.as_str(), student))
            }),
            scope,
            today,
        )
    }

    /// Aggregate over students tagged with their owning hostel id. Only
    /// active students inside the scope participate; the pass is a pure
    /// function of its inputs and `today`.
    pub fn from_students<'a, I>(students: I, scope: &HostelScope, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a Student)>,
    {
        let mut totals = Self::default();

        for (hostel_id, student) in students {
            if !student.is_active || !scope.includes(hostel_id) {
                continue;
            }

            let status = payment_status(student, today);
            match status {
                PaymentStatus::Paid => totals.amount_collected += student.fee_amount,
                PaymentStatus::Unpaid => totals.pending_fees += student.fee_amount,
            }

            // Date-derived counters need a parseable join date; students with
            // corrupt dates already classified above and contribute nothing here.
            let Some(join) = parse_iso_date(&student.join_date) else {
                continue;
            };

            let days_since_join = (today - join).num_days();
            if (0..NEW_JOIN_WINDOW_DAYS).contains(&days_since_join) {
                totals.new_joins += 1;
            }

            // No due date exists inside the grace month.
            if months_since(join, today) <= 0 {
                continue;
            }

            if let Some(due) = monthly_due_date(join, today.year(), today.month()) {
                if due == today {
                    totals.dues_today += 1;
                } else if due < today && status == PaymentStatus::Unpaid {
                    totals.overdue_payments += 1;
                }
            }
        }

        totals
    }
}

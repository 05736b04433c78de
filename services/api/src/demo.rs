use crate::infra::parse_date;
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use hostel_ops::error::AppError;
use hostel_ops::portfolio::billing::month_key;
use hostel_ops::portfolio::{
    DashboardSummary, DueStudentView, HostelGender, HostelScope, InMemoryOwnerRepository,
    NewHostel, NewOwner, NewRoom, NewStudent, Owner, OwnerRepository, PaymentEntry, PaymentStatus,
    PortfolioService, SharingType,
};
use hostel_ops::roster::RosterImporter;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the evaluation date (defaults to today).
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Optional roster CSV to bulk-import into the demo hostel.
    #[arg(long)]
    pub(crate) roster_csv: Option<PathBuf>,
    /// Include the per-room occupancy breakdown in the output.
    #[arg(long)]
    pub(crate) list_rooms: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DashboardReportArgs {
    /// Owner snapshot as exported from the document store (JSON)
    #[arg(long)]
    pub(crate) owner_json: PathBuf,
    /// Restrict the report to one hostel id (defaults to all hostels)
    #[arg(long, default_value = "all")]
    pub(crate) scope: String,
    /// Evaluation date for the report (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Include the due-payments listing in the output
    #[arg(long)]
    pub(crate) list_dues: bool,
}

pub(crate) struct SeededDemo {
    pub(crate) owner_id: String,
}

/// Seed a small but realistic portfolio: two hostels, mixed payment states,
/// one new join inside the trailing week, one vacated student.
pub(crate) fn seed_demo_portfolio(
    service: &Arc<PortfolioService<InMemoryOwnerRepository>>,
    today: NaiveDate,
) -> Result<SeededDemo, AppError> {
    let owner_id = "owner-demo".to_string();
    let current_month = month_key(today);

    service.register_owner(
        &owner_id,
        NewOwner {
            full_name: "Ravi Kumar".to_string(),
            email: "ravi@example.com".to_string(),
            phone: "9876543210".to_string(),
        },
        today - Duration::days(400),
    )?;

    let sunrise = service.register_hostel(
        &owner_id,
        NewHostel {
            name: "Sunrise PG".to_string(),
            location: "Koramangala".to_string(),
            gender: HostelGender::Gents,
        },
        today - Duration::days(400),
    )?;
    let shanti = service.register_hostel(
        &owner_id,
        NewHostel {
            name: "Shanti PG".to_string(),
            location: "Indiranagar".to_string(),
            gender: HostelGender::Ladies,
        },
        today - Duration::days(300),
    )?;

    let room_101 = service.register_room(
        &owner_id,
        &sunrise,
        NewRoom {
            room_number: "101".to_string(),
            capacity: None,
            sharing_type: SharingType::Double,
        },
    )?;
    let room_102 = service.register_room(
        &owner_id,
        &sunrise,
        NewRoom {
            room_number: "102".to_string(),
            capacity: None,
            sharing_type: SharingType::Single,
        },
    )?;
    let room_a1 = service.register_room(
        &owner_id,
        &shanti,
        NewRoom {
            room_number: "A1".to_string(),
            capacity: None,
            sharing_type: SharingType::Double,
        },
    )?;

    let amit = service.register_student(
        &owner_id,
        &sunrise,
        NewStudent {
            full_name: "Amit Verma".to_string(),
            phone: "9000000001".to_string(),
            room_id: room_101.clone(),
            join_date: (today - Duration::days(75)).to_string(),
            fee_amount: 6000.0,
        },
    )?;
    service.register_student(
        &owner_id,
        &sunrise,
        NewStudent {
            full_name: "Preeti Singh".to_string(),
            phone: "9000000002".to_string(),
            room_id: room_101,
            join_date: (today - Duration::days(45)).to_string(),
            fee_amount: 6000.0,
        },
    )?;
    service.register_student(
        &owner_id,
        &sunrise,
        NewStudent {
            full_name: "Kiran Rao".to_string(),
            phone: "9000000003".to_string(),
            room_id: room_102,
            join_date: (today - Duration::days(3)).to_string(),
            fee_amount: 5500.0,
        },
    )?;
    let divya = service.register_student(
        &owner_id,
        &shanti,
        NewStudent {
            full_name: "Divya Nair".to_string(),
            phone: "9000000004".to_string(),
            room_id: room_a1.clone(),
            join_date: (today - Duration::days(120)).to_string(),
            fee_amount: 7000.0,
        },
    )?;
    let suresh = service.register_student(
        &owner_id,
        &shanti,
        NewStudent {
            full_name: "Suresh Babu".to_string(),
            phone: "9000000005".to_string(),
            room_id: room_a1,
            join_date: (today - Duration::days(200)).to_string(),
            fee_amount: 7000.0,
        },
    )?;

    // Amit and Divya have settled the current month; Preeti has not.
    for (hostel_id, student_id, amount) in
        [(&sunrise, &amit, 6000.0), (&shanti, &divya, 7000.0)]
    {
        service.record_payment(
            &owner_id,
            hostel_id,
            student_id,
            PaymentEntry {
                month: current_month.clone(),
                amount,
                due_amount: 0.0,
                status: PaymentStatus::Paid,
                paid_date: None,
                remarks: "UPI".to_string(),
            },
            today - Duration::days(2),
        )?;
    }

    service.vacate_student(&owner_id, &shanti, &suresh, today - Duration::days(10))?;

    Ok(SeededDemo { owner_id })
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        roster_csv,
        list_rooms,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let repository = Arc::new(InMemoryOwnerRepository::default());
    let service = Arc::new(PortfolioService::new(repository));
    let seeded = seed_demo_portfolio(&service, today)?;

    println!("Hostel portfolio demo");
    println!("Evaluated {} for owner {}", today, seeded.owner_id);

    if let Some(path) = roster_csv {
        let owner = service
            .store()
            .owner_snapshot(&seeded.owner_id)
            .map_err(hostel_ops::portfolio::PortfolioError::from)?
            .unwrap_or_default();
        // Import into the first hostel; the demo seed keys them by creation order.
        if let Some(hostel_id) = owner.hostels.keys().next().cloned() {
            let outcome = RosterImporter::from_path(&path, &service, &seeded.owner_id, &hostel_id)?;
            println!(
                "\nRoster import: {} registered, {} skipped ({})",
                outcome.created.len(),
                outcome.skipped.len(),
                path.display()
            );
            for skip in &outcome.skipped {
                println!("- line {}: {}", skip.line, skip.reason);
            }
        }
    }

    let summary = service.dashboard(&seeded.owner_id, &HostelScope::All, today)?;
    render_dashboard(&summary);

    let due = service.due_students(&seeded.owner_id, &HostelScope::All, today)?;
    render_due_listing(&due);

    if list_rooms {
        let owner = service
            .store()
            .owner_snapshot(&seeded.owner_id)
            .map_err(hostel_ops::portfolio::PortfolioError::from)?
            .unwrap_or_default();
        for hostel_id in owner.hostels.keys() {
            let view = service.occupancy(&seeded.owner_id, hostel_id)?;
            println!("\nOccupancy - {}", view.hostel_name);
            for room in &view.rooms {
                println!(
                    "- {}: {}/{}{}",
                    room.room_number,
                    room.occupied,
                    room.capacity,
                    if room.is_full { " (full)" } else { "" }
                );
            }
        }
    }

    let feed = service.recent_activities(&seeded.owner_id, None)?;
    if !feed.is_empty() {
        println!("\nRecent activity");
        for activity in &feed {
            println!("- [{}] {} ({})", activity.icon, activity.text, activity.created_at);
        }
    }

    Ok(())
}

pub(crate) fn run_dashboard_report(args: DashboardReportArgs) -> Result<(), AppError> {
    let DashboardReportArgs {
        owner_json,
        scope,
        today,
        list_dues,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let scope = HostelScope::parse(&scope);

    let file = std::fs::File::open(&owner_json)?;
    let owner: Owner = serde_json::from_reader(file)?;

    let repository = Arc::new(InMemoryOwnerRepository::default());
    let owner_id = "owner-snapshot";
    repository
        .create_owner(owner_id, owner)
        .map_err(hostel_ops::portfolio::PortfolioError::from)?;
    let service = Arc::new(PortfolioService::new(repository));

    println!("Dashboard report");
    println!(
        "Snapshot: {} (evaluated {})",
        owner_json.display(),
        today
    );

    let summary = service.dashboard(owner_id, &scope, today)?;
    render_dashboard(&summary);

    if list_dues {
        let due = service.due_students(owner_id, &scope, today)?;
        render_due_listing(&due);
    }

    Ok(())
}

fn render_dashboard(summary: &DashboardSummary) {
    println!("\nDashboard");
    println!("- Hostels: {}", summary.total_hostels);
    println!("- Active students: {}", summary.total_students);
    println!("- Amount collected: {}", summary.amount_collected);
    println!("- Pending fees: {}", summary.pending_fees);
    println!("- Dues today: {}", summary.dues_today);
    println!("- Overdue payments: {}", summary.overdue_payments);
    println!("- New joins (7 days): {}", summary.new_joins);
    println!("- Vacant rooms: {}", summary.vacant_rooms);
}

fn render_due_listing(due: &[DueStudentView]) {
    if due.is_empty() {
        println!("\nDue payments: none");
        return;
    }

    println!("\nDue payments");
    for row in due {
        let due_note = match row.due_date {
            Some(date) => format!(", due {date}"),
            None => String::new(),
        };
        println!(
            "- {} (room {}), {}{}",
            row.full_name, row.room_id, row.fee_amount, due_note
        );
    }
}

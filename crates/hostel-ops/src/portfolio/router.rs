use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::billing::parse_iso_date;
use super::finance::HostelScope;
use super::service::{
    NewHostel, NewOwner, NewRoom, NewStudent, PaymentEntry, PortfolioError, PortfolioService,
};
use super::store::{OwnerRepository, StoreError};
use crate::error::AppError;
use crate::roster::{RosterImportOutcome, RosterImporter};

/// Router builder exposing the owner-scoped portfolio API.
pub fn portfolio_router<S>(service: Arc<PortfolioService<S>>) -> Router
where
    S: OwnerRepository + 'static,
{
    Router::new()
        .route("/api/v1/owners/:owner_id", post(register_owner_handler::<S>))
        .route(
            "/api/v1/owners/:owner_id/dashboard",
            get(dashboard_handler::<S>),
        )
        .route(
            "/api/v1/owners/:owner_id/due-payments",
            get(due_payments_handler::<S>),
        )
        .route(
            "/api/v1/owners/:owner_id/vacated-students",
            get(vacated_students_handler::<S>),
        )
        .route(
            "/api/v1/owners/:owner_id/activities",
            get(activities_handler::<S>),
        )
        .route(
            "/api/v1/owners/:owner_id/hostels",
            post(register_hostel_handler::<S>),
        )
        .route(
            "/api/v1/owners/:owner_id/hostels/:hostel_id/occupancy",
            get(occupancy_handler::<S>),
        )
        .route(
            "/api/v1/owners/:owner_id/hostels/:hostel_id/rooms",
            post(register_room_handler::<S>),
        )
        .route(
            "/api/v1/owners/:owner_id/hostels/:hostel_id/students",
            post(register_student_handler::<S>),
        )
        .route(
            "/api/v1/owners/:owner_id/hostels/:hostel_id/roster",
            post(roster_import_handler::<S>),
        )
        .route(
            "/api/v1/owners/:owner_id/hostels/:hostel_id/students/:student_id/payments",
            post(record_payment_handler::<S>),
        )
        .route(
            "/api/v1/owners/:owner_id/hostels/:hostel_id/students/:student_id/vacate",
            post(vacate_student_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportQuery {
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    today: Option<String>,
}

impl ReportQuery {
    fn scope(&self) -> HostelScope {
        self.scope
            .as_deref()
            .map(HostelScope::parse)
            .unwrap_or(HostelScope::All)
    }

    /// The evaluation date, defaulting to the local date at this edge only.
    fn today(&self) -> Result<NaiveDate, Response> {
        match self.today.as_deref() {
            None => Ok(Local::now().date_naive()),
            Some(raw) => parse_iso_date(raw).ok_or_else(|| {
                let payload = json!({ "error": format!("'{raw}' is not a valid ISO-8601 date") });
                (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActivitiesQuery {
    #[serde(default)]
    max: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EntryDateQuery {
    #[serde(default)]
    date: Option<String>,
}

impl EntryDateQuery {
    fn date(&self) -> Result<NaiveDate, Response> {
        match self.date.as_deref() {
            None => Ok(Local::now().date_naive()),
            Some(raw) => parse_iso_date(raw).ok_or_else(|| {
                let payload = json!({ "error": format!("'{raw}' is not a valid ISO-8601 date") });
                (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
            }),
        }
    }
}

fn error_response(error: PortfolioError) -> Response {
    let status = match &error {
        PortfolioError::Store(StoreError::OwnerNotFound)
        | PortfolioError::Store(StoreError::HostelNotFound)
        | PortfolioError::Store(StoreError::RoomNotFound)
        | PortfolioError::Store(StoreError::StudentNotFound) => StatusCode::NOT_FOUND,
        PortfolioError::Store(StoreError::Conflict)
        | PortfolioError::RoomFull { .. }
        | PortfolioError::DuplicateRoomNumber(_)
        | PortfolioError::AlreadyVacated => StatusCode::CONFLICT,
        PortfolioError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        PortfolioError::UnknownRoom(_)
        | PortfolioError::InvalidCapacity
        | PortfolioError::NegativeFee
        | PortfolioError::InvalidDate(_)
        | PortfolioError::InvalidMonthKey(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn register_owner_handler<S>(
    State(service): State<Arc<PortfolioService<S>>>,
    Path(owner_id): Path<String>,
    axum::Json(new_owner): axum::Json<NewOwner>,
) -> Response
where
    S: OwnerRepository + 'static,
{
    let created_on = Local::now().date_naive();
    match service.register_owner(&owner_id, new_owner, created_on) {
        Ok(()) => {
            let payload = json!({ "ownerId": owner_id });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dashboard_handler<S>(
    State(service): State<Arc<PortfolioService<S>>>,
    Path(owner_id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Response
where
    S: OwnerRepository + 'static,
{
    let today = match query.today() {
        Ok(today) => today,
        Err(response) => return response,
    };
    match service.dashboard(&owner_id, &query.scope(), today) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn due_payments_handler<S>(
    State(service): State<Arc<PortfolioService<S>>>,
    Path(owner_id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Response
where
    S: OwnerRepository + 'static,
{
    let today = match query.today() {
        Ok(today) => today,
        Err(response) => return response,
    };
    match service.due_students(&owner_id, &query.scope(), today) {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn vacated_students_handler<S>(
    State(service): State<Arc<PortfolioService<S>>>,
    Path(owner_id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Response
where
    S: OwnerRepository + 'static,
{
    match service.vacated_students(&owner_id, &query.scope()) {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn activities_handler<S>(
    State(service): State<Arc<PortfolioService<S>>>,
    Path(owner_id): Path<String>,
    Query(query): Query<ActivitiesQuery>,
) -> Response
where
    S: OwnerRepository + 'static,
{
    match service.recent_activities(&owner_id, query.max) {
        Ok(feed) => (StatusCode::OK, axum::Json(feed)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn occupancy_handler<S>(
    State(service): State<Arc<PortfolioService<S>>>,
    Path((owner_id, hostel_id)): Path<(String, String)>,
) -> Response
where
    S: OwnerRepository + 'static,
{
    match service.occupancy(&owner_id, &hostel_id) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn register_hostel_handler<S>(
    State(service): State<Arc<PortfolioService<S>>>,
    Path(owner_id): Path<String>,
    axum::Json(new_hostel): axum::Json<NewHostel>,
) -> Response
where
    S: OwnerRepository + 'static,
{
    let created_on = Local::now().date_naive();
    match service.register_hostel(&owner_id, new_hostel, created_on) {
        Ok(hostel_id) => {
            let payload = json!({ "hostelId": hostel_id });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn register_room_handler<S>(
    State(service): State<Arc<PortfolioService<S>>>,
    Path((owner_id, hostel_id)): Path<(String, String)>,
    axum::Json(new_room): axum::Json<NewRoom>,
) -> Response
where
    S: OwnerRepository + 'static,
{
    match service.register_room(&owner_id, &hostel_id, new_room) {
        Ok(room_id) => {
            let payload = json!({ "roomId": room_id });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn register_student_handler<S>(
    State(service): State<Arc<PortfolioService<S>>>,
    Path((owner_id, hostel_id)): Path<(String, String)>,
    axum::Json(new_student): axum::Json<NewStudent>,
) -> Response
where
    S: OwnerRepository + 'static,
{
    match service.register_student(&owner_id, &hostel_id, new_student) {
        Ok(student_id) => {
            let payload = json!({ "studentId": student_id });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn roster_import_handler<S>(
    State(service): State<Arc<PortfolioService<S>>>,
    Path((owner_id, hostel_id)): Path<(String, String)>,
    body: String,
) -> Result<axum::Json<RosterImportOutcome>, AppError>
where
    S: OwnerRepository + 'static,
{
    let reader = std::io::Cursor::new(body.into_bytes());
    let outcome = RosterImporter::from_reader(reader, service.as_ref(), &owner_id, &hostel_id)?;
    Ok(axum::Json(outcome))
}

pub(crate) async fn record_payment_handler<S>(
    State(service): State<Arc<PortfolioService<S>>>,
    Path((owner_id, hostel_id, student_id)): Path<(String, String, String)>,
    Query(query): Query<EntryDateQuery>,
    axum::Json(entry): axum::Json<PaymentEntry>,
) -> Response
where
    S: OwnerRepository + 'static,
{
    let recorded_on = match query.date() {
        Ok(date) => date,
        Err(response) => return response,
    };
    match service.record_payment(&owner_id, &hostel_id, &student_id, entry, recorded_on) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn vacate_student_handler<S>(
    State(service): State<Arc<PortfolioService<S>>>,
    Path((owner_id, hostel_id, student_id)): Path<(String, String, String)>,
    Query(query): Query<EntryDateQuery>,
) -> Response
where
    S: OwnerRepository + 'static,
{
    let leave_date = match query.date() {
        Ok(date) => date,
        Err(response) => return response,
    };
    match service.vacate_student(&owner_id, &hostel_id, &student_id, leave_date) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

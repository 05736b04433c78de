//! Bulk student onboarding from CSV roster exports.

mod mapping;
mod parser;

use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::portfolio::service::{NewStudent, PortfolioError, PortfolioService};
use crate::portfolio::store::{OwnerRepository, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read roster file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid roster CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Portfolio(#[from] PortfolioError),
}

/// A row the importer chose not to register, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSkip {
    pub line: usize,
    pub reason: String,
}

/// Result of one import pass: registered student ids plus per-row skips.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterImportOutcome {
    pub created: Vec<String>,
    pub skipped: Vec<RosterSkip>,
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P, S>(
        path: P,
        service: &PortfolioService<S>,
        owner_id: &str,
        hostel_id: &str,
    ) -> Result<RosterImportOutcome, RosterImportError>
    where
        P: AsRef<Path>,
        S: OwnerRepository + 'static,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, service, owner_id, hostel_id)
    }

    /// Register every usable roster row into the hostel. Rows that cannot be
    /// registered (missing name, unknown or full room, unusable join date)
    /// are reported in the outcome rather than aborting the import; a
    /// missing owner or hostel is fatal.
    pub fn from_reader<R, S>(
        reader: R,
        service: &PortfolioService<S>,
        owner_id: &str,
        hostel_id: &str,
    ) -> Result<RosterImportOutcome, RosterImportError>
    where
        R: Read,
        S: OwnerRepository + 'static,
    {
        let records = parser::parse_records(reader)?;

        // One snapshot up front resolves room numbers to document ids; the
        // roster column may hold either.
        let owner = service
            .store()
            .owner_snapshot(owner_id)
            .map_err(PortfolioError::from)?
            .ok_or(PortfolioError::Store(StoreError::OwnerNotFound))?;
        let hostel = owner
            .hostels
            .get(hostel_id)
            .ok_or(PortfolioError::Store(StoreError::HostelNotFound))?;

        let mut outcome = RosterImportOutcome::default();
        for record in records {
            if record.full_name.is_empty() {
                outcome.skipped.push(RosterSkip {
                    line: record.line,
                    reason: "missing student name".to_string(),
                });
                continue;
            }

            let room_id = if hostel.rooms.contains_key(&record.room) {
                Some(record.room.clone())
            } else {
                hostel
                    .rooms
                    .iter()
                    .find(|(_, room)| room.room_number == record.room)
                    .map(|(room_id, _)| room_id.clone())
            };
            let Some(room_id) = room_id else {
                outcome.skipped.push(RosterSkip {
                    line: record.line,
                    reason: format!("unknown room '{}'", record.room),
                });
                continue;
            };

            let new_student = NewStudent {
                full_name: record.full_name,
                phone: record.phone,
                room_id,
                join_date: record.join_date,
                fee_amount: record.fee_amount,
            };

            match service.register_student(owner_id, hostel_id, new_student) {
                Ok(student_id) => outcome.created.push(student_id),
                // Store-level failures mean the import target itself is gone.
                Err(error @ PortfolioError::Store(_)) => return Err(error.into()),
                Err(error) => outcome.skipped.push(RosterSkip {
                    line: record.line,
                    reason: error.to_string(),
                }),
            }
        }

        Ok(outcome)
    }
}

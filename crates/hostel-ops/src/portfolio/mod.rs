//! The owner portfolio domain: documents, billing rules, aggregation, and
//! the service/API surface over the document store.

pub mod billing;
pub mod finance;
pub mod model;
pub mod occupancy;
pub mod report;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use finance::{FinanceTotals, HostelScope};
pub use model::{
    Hostel, HostelGender, Owner, Payment, PaymentStatus, RecentActivity, Room, SharingType,
    Student,
};
pub use occupancy::{OccupancyReport, RoomFill};
pub use report::{DashboardSummary, DueStudentView, VacatedStudentView};
pub use router::portfolio_router;
pub use service::{
    NewHostel, NewOwner, NewRoom, NewStudent, PaymentEntry, PortfolioError, PortfolioService,
};
pub use store::{InMemoryOwnerRepository, OwnerRepository, StoreError};

mod summary;
pub mod views;

pub use summary::{due_students, vacated_students};
pub use views::{DashboardSummary, DueStudentView, VacatedStudentView};

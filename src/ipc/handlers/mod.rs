pub mod attendance;
pub mod backup;
pub mod core;
pub mod dashboard;
pub mod insights;
pub mod records;
pub mod session;
pub mod students;

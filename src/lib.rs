// todotrack - Interactive TODO tracker with urgency levels and an audit log

pub mod audit;
pub mod export;
pub mod shell;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use audit::AuditLog;
pub use export::ExportFormat;
pub use shell::Shell;
pub use store::{TaskCounts, TaskStore, UrgencyCounts};
pub use task::{Task, Urgency};

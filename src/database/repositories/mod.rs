pub mod audit;
pub mod employee;
pub mod location;
pub mod payment;
pub mod submission;
pub mod user;

// Re-export all repositories for easy importing
pub use audit::AuditRepository;
pub use employee::EmployeeRepository;
pub use location::LocationRepository;
pub use payment::PaymentRepository;
pub use submission::{BatchWrite, SubmissionRepository};
pub use user::UserRepository;

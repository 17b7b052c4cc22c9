pub mod audit_logger;
pub mod auth;
pub mod draft;
pub mod poster;
pub mod submission;

pub use audit_logger::AuditLogger;
pub use auth::{AuthService, Claims};
pub use draft::{DraftReceipt, DraftService};
pub use poster::PostingService;
pub use submission::SubmissionService;

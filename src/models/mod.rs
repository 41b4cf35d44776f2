//! Data models for the service desk

pub mod account;
pub mod applicant;
pub mod ids;
pub mod manager;
pub mod mechanic;
pub mod request;
pub mod service_center;
pub mod transport;

// Re-export commonly used types
pub use account::{Account, AccountKind, Profile};
pub use applicant::Applicant;
pub use manager::Manager;
pub use mechanic::Mechanic;
pub use request::{Request, RequestDetails, RequestStatus};
pub use service_center::ServiceCenter;
pub use transport::Transport;

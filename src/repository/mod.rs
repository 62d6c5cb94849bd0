//! Database access layer

pub mod alert_repo;
pub mod audit_repo;
pub mod backup_repo;
pub mod resource_repo;
pub mod session_repo;
pub mod stats_repo;
pub mod user_repo;

pub use alert_repo::AlertRepository;
pub use audit_repo::AuditRepository;
pub use backup_repo::BackupRepository;
pub use resource_repo::ResourceRepository;
pub use session_repo::SessionRepository;
pub use stats_repo::StatsRepository;
pub use user_repo::UserRepository;

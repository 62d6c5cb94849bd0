//! Business services

pub mod auth_service;
pub mod backup_service;
pub mod permission_service;
pub mod security_service;

pub use auth_service::AuthService;
pub use backup_service::BackupService;
pub use permission_service::PermissionService;
pub use security_service::SecurityService;

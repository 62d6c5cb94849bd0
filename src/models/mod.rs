//! Domain models

pub mod alert;
pub mod audit;
pub mod auth;
pub mod backup;
pub mod resource;
pub mod session;
pub mod user;

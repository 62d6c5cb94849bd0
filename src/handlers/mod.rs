//! HTTP handlers

pub mod alert;
pub mod audit;
pub mod auth;
pub mod backup;
pub mod dashboard;
pub mod health;
pub mod resource;
pub mod user;

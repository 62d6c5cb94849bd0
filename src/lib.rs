//! Secure internal administration backend.
//!
//! Authentication, role-based authorization, resource management, alerting,
//! audit logging and backup/restore over a single SQLite database file.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;

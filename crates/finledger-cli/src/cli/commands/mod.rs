//! CLI command handlers.

pub mod accounts;
pub mod auth;
pub mod calendar;
pub mod categories;
pub mod config;
pub mod stats;
pub mod transactions;

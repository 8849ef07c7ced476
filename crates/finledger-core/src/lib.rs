//! Core library for finledger: session handling, the authenticated backend
//! client, route protection, and the computations behind each view.

pub mod api;
pub mod auth;
pub mod config;
pub mod guard;
pub mod models;
pub mod session;
pub mod views;

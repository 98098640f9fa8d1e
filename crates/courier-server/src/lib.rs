//! Health-check HTTP server: routes and configuration.

pub mod config;
pub mod routes;

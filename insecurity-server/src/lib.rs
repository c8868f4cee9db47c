// Library exports for insecurity-server
// This allows the binary and the integration tests to share modules

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod state;
pub mod uploads;

// Library exports for nvote
// This allows integration tests and external code to use nvote modules

pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;

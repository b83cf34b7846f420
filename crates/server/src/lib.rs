pub mod clients;
pub mod config;
pub mod error;
pub mod history;
pub mod routes;

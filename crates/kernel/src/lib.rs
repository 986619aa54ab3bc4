//! DiscoZone Forum Kernel Library
//!
//! Post feed query engine, forum models, and HTTP routes.
//! The main entry point for running the server is the `discozone` binary.

pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod models;
pub mod routes;
pub mod state;

pub use config::Config;
pub use state::AppState;

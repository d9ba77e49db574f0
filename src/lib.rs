//! db-run - a command-line SQL batch runner.
//!
//! This library exposes the core modules for use in integration tests.

pub mod cli;
pub mod db;
pub mod error;
pub mod exec;
pub mod extract;
pub mod render;

//! Shared types, errors and configuration for the mentorship notifier workspace.

pub mod config;
pub mod error;
pub mod types;

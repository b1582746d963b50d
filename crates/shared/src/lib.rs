//! Shared types, errors, and configuration for Svault.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for catalog records
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, ServerConfig, StagingConfig, StorageSettings};
pub use error::AppError;
pub use types::FileId;

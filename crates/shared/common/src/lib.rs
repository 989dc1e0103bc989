//! Common utilities shared by the registration service.
//!
//! This crate provides:
//! - Unified error handling for the HTTP adapter
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, FieldError};

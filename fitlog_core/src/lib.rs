#![forbid(unsafe_code)]

//! Core domain model and business logic for fitlog.
//!
//! This crate provides:
//! - Domain types (users, activities, exercise kinds)
//! - Calorie estimation per exercise kind
//! - The user registry and its mutations
//! - Persistence (JSON users file, CSV export)
//! - Configuration and logging setup

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod registry;
pub mod recorder;
pub mod estimator;
pub mod shared;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::{JsonFileStore, UserStore};
pub use registry::UserRegistry;
pub use estimator::{default_coefficients, estimate_energy, CoefficientTable};
pub use shared::SharedRegistry;
pub use export::export_history;

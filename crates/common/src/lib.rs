//! nmapreport Common - Shared types and traits
//!
//! This crate provides the report view types, the fingerprinting trait,
//! and the error type used across the nmapreport workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{ReportError, ReportResult};
pub use traits::Fingerprinter;
pub use types::{ReconMatch, Report, ReportHost, ReportPort};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

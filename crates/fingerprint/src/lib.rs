//! Fingerprint Engine - Recog database loading and banner matching
//!
//! This crate provides:
//! - Recog XML database parsing (`quick-xml`)
//! - Pattern compilation with Recog flags (`regex`)
//! - First-match lookup per database and across a directory of databases

mod database;
mod matcher;

pub use database::{FingerprintDatabase, FingerprintSet};
pub use matcher::{Fingerprint, FingerprintMatch, Param, DEFAULT_CERTAINTY};

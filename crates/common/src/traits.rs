//! Core traits for nmapreport components

use crate::types::ReconMatch;

/// Service fingerprinting seam between the report builder and a
/// fingerprint database implementation.
pub trait Fingerprinter {
    /// First match of every database against `banner`, in database-name order.
    /// Databases without a match are omitted.
    fn recon(&self, banner: &str) -> Vec<ReconMatch>;

    /// Get number of loaded signatures
    fn signature_count(&self) -> usize {
        0
    }
}

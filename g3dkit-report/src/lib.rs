//! Reporting and batch processing for G3D models
//!
//! [`model_report`] combines the rigidity and deduplication analyses into a
//! per-mesh estimate of what a compressed model would cost, and
//! [`process_files`] runs it over many files at once.

pub mod stats;
pub mod batch;

pub use stats::*;
pub use batch::*;

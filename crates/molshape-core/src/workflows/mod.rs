//! # Workflows Module
//!
//! The public entry points of MolShape.
//!
//! - **Classification Workflow** ([`classify`]) - Turns submitted names (or raw
//!   identifiers) into one [`classify::ClassificationResult`] per line, in
//!   input order, isolating every per-line failure.
//! - **Reporting** ([`report`]) - CSV export of a result set.

pub mod classify;
pub mod report;

//! # MolShape Core Library
//!
//! Resolves chemical names to structures, classifies each molecule's overall
//! shape from its ring and rotatable-bond counts, and renders 2D diagrams.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Stateless models (`Molecule`), the SMILES
//!   reader, structural descriptors and the shape classifier.
//!
//! - **[`engine`]: The Collaborators.** Configuration, the remote name
//!   resolver, layout and PNG rendering, and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Drives resolver, parser, classifier
//!   and renderer over a submission and produces ordered per-line results.

pub mod core;
pub mod engine;
pub mod workflows;

//! # Engine Module
//!
//! Stateful collaborators that the classification workflow drives: the
//! remote name resolver, the diagram renderer and the run configuration.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Validated pipeline settings and their builder
//! - **Name Resolution** ([`resolver`]) - The [`resolver::NameResolver`] seam and the PubChem client
//! - **Depiction** ([`layout`], [`render`]) - Force-directed 2D layout and PNG rasterization
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Failures that prevent a run from starting

pub mod config;
pub mod error;
pub mod layout;
pub mod progress;
pub mod render;
pub mod resolver;

//! # Shape Module
//!
//! Structural descriptors and the rule table that turns them into a
//! [`classifier::ShapeCategory`].
//!
//! - [`rings`] - Relevant ring perception (every face of bridged and cage systems)
//! - [`descriptors`] - Ring count, strict rotatable-bond count and heavy-atom count
//! - [`classifier`] - First-match mapping from descriptors to a shape category

pub mod classifier;
pub mod descriptors;
pub mod rings;

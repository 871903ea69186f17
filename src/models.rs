//! Public forward-operator models.
//!
//! Models are the primary public interface of this crate.
//!
//! # Organization
//!
//! Models are organized into method-specific submodules (e.g., `magnetics`)
//! based on the geophysical survey method they serve. This organization may
//! evolve as more methods are added.
//!
//! # Model structure
//!
//! Each model owns its survey configuration (geometry, receivers, requested
//! components, source field) and implements the
//! [`crate::forward::ForwardOperator`] contract as a thin surface over the
//! reusable building blocks in [`crate::support`].

pub mod magnetics;

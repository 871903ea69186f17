//! # Potfield Models
//!
//! Forward-modelling operators for potential-field geophysics
//! (magnetics and gravimetry).
//!
//! The centerpiece is [`models::magnetics::MagneticsModel`], a linear forward
//! operator: it resolves an ambient geomagnetic field specification, invokes a
//! sensitivity kernel solver once, assembles the per-component sensitivities
//! into a block-structured Jacobian, and answers every response request as a
//! cheap matrix-vector product against that operator.
//!
//! ## Crate layout
//!
//! - [`forward`]: The [`forward::ForwardOperator`] contract consumed by
//!   external inversion frameworks.
//! - [`models`]: Domain-specific forward operator implementations.
//! - [`support`]: Supporting building blocks used by models (field
//!   parameterization, block operators, kernel and geometry contracts).
//!
//! ## Utility code lifecycle
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.

pub mod forward;
pub mod models;
pub mod support;

//! Supporting building blocks used by models.
//!
//! - [`block`]: Block-structured linear operators (stacked Jacobians).
//! - [`component`]: Response components of potential-field surveys.
//! - [`dipole`]: Magnetic dipole fields and a dipole-based kernel solver.
//! - [`field`]: Geomagnetic reference field specification and resolution.
//! - [`geometry`]: Source geometry contract and coordinate conventions.
//! - [`kernel`]: Sensitivity kernel solver contract.

pub mod block;
pub mod component;
pub mod dipole;
pub mod field;
pub mod geometry;
pub mod kernel;

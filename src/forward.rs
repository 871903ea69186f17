//! Forward-operator contract consumed by inversion frameworks.
//!
//! An external least-squares engine couples to a forward model through exactly
//! two operations: evaluating the response for a trial model, and obtaining
//! the sensitivity of that response as a linear operator. Nothing else about
//! the model is visible to the solver.

use ndarray::{Array1, ArrayView1};

use crate::support::block::BlockOperator;

/// A forward model usable by a generic least-squares inversion.
///
/// Implementors map a 1-D model parameter vector (one physical property value
/// per source cell) to a 1-D data vector (stacked per-component responses, one
/// entry per receiver per component).
///
/// Methods take `&mut self` because implementations may compute and cache
/// expensive internal state on first use. The borrow rules thereby serialize
/// the lazy transition; sharing an operator across workers requires external
/// synchronization around the first call.
pub trait ForwardOperator {
    type Error;

    /// Computes the forward response for the given model parameters.
    ///
    /// # Errors
    ///
    /// Fails if the operator is not fully configured or if `model` has the
    /// wrong length.
    fn response(&mut self, model: ArrayView1<'_, f64>) -> Result<Array1<f64>, Self::Error>;

    /// Returns the sensitivity of the response at `model`.
    ///
    /// Linear problems return the same operator for every `model`; consumers
    /// must not re-derive it numerically in that case.
    ///
    /// # Errors
    ///
    /// Fails if the operator is not fully configured.
    fn jacobian(&mut self, model: ArrayView1<'_, f64>) -> Result<&BlockOperator, Self::Error>;
}

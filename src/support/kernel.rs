//! Sensitivity kernel solver contract.
//!
//! The numerical method computing per-cell, per-receiver sensitivities (e.g.
//! an analytic prism or tetrahedron integration) lives outside this crate.
//! Forward operators consume it through [`SensitivityKernel`].

use ndarray::{Array3, ArrayView2};

use crate::support::{component::Component, field::FieldVector, geometry::SourceGeometry};

/// A solver computing the sensitivity of responses to source-cell properties.
///
/// The returned tensor is indexed `(observation, component, cell)`: entry
/// `[o, c, s]` scales a unit property change in cell `s` to the induced
/// change of component `c` at receiver `o`.
///
/// Receiver `points` arrive already converted to the geometry's NED
/// convention; callers are responsible for that conversion. Implementations
/// are assumed deterministic and expensive — orchestrators invoke `compute`
/// at most once per unchanged `(geometry, points, field, components)` tuple
/// and cache the result.
pub trait SensitivityKernel<G: SourceGeometry> {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Computes the sensitivity tensor for the requested components.
    ///
    /// # Errors
    ///
    /// Implementation-specific; typically unsupported components or solver
    /// breakdowns.
    fn compute(
        &self,
        geometry: &G,
        points: ArrayView2<'_, f64>,
        field: &FieldVector,
        components: &[Component],
    ) -> Result<Array3<f64>, Self::Error>;
}

//! Magnetics forward operator.
//!
//! [`MagneticsModel`] maps a per-cell property model (susceptibility) to the
//! stacked responses of the requested components at the survey receivers.
//! The problem is linear: the assembled block operator *is* the Jacobian and
//! does not depend on the evaluation point, so
//! [`jacobian`](crate::forward::ForwardOperator::jacobian) returns the cached
//! operator unchanged for every model. Consuming inversion frameworks must
//! not re-derive it numerically.
//!
//! Kernel computation is expensive and happens lazily, at most once per
//! configuration: the first [`response`](crate::forward::ForwardOperator::response)
//! or [`jacobian`](crate::forward::ForwardOperator::jacobian) call converts
//! the receivers to NED, invokes the kernel solver, and assembles the block
//! Jacobian. Changing the geometry or the receivers drops the cache.

mod error;
#[cfg(test)]
mod test_support;

pub use error::MagneticsError;

use ndarray::{Array1, Array2, Array3, ArrayView1};

use crate::{
    forward::ForwardOperator,
    support::{
        block::BlockOperator,
        component::{Component, validate_components},
        field::{FieldReference, FieldVector, ReferenceFieldModel, resolve},
        geometry::{GeometryError, SourceGeometry, sensors_to_ned},
        kernel::SensitivityKernel,
    },
};

/// Kernel tensor and assembled operator, built together and dropped together.
#[derive(Debug)]
struct Cache {
    sensitivity: Array3<f64>,
    jacobian: BlockOperator,
}

/// The magnetics (and by component choice, gravimetry) forward operator.
///
/// Generic over the source geometry `G` and the kernel solver `K`. The
/// ambient field reference is resolved exactly once, at construction, and is
/// immutable afterward. Geometry and receivers may be supplied later;
/// responses before both are set fail with
/// [`MagneticsError::MissingGeometry`] / [`MagneticsError::MissingPoints`].
#[derive(Debug)]
pub struct MagneticsModel<G, K> {
    geometry: Option<G>,
    points: Option<Array2<f64>>,
    components: Vec<Component>,
    field: FieldVector,
    solver: K,
    cache: Option<Cache>,
}

impl<G, K> MagneticsModel<G, K>
where
    G: SourceGeometry,
    K: SensitivityKernel<G>,
{
    /// Sets up a forward operator with a vector or full-descriptor field
    /// reference.
    ///
    /// # Errors
    ///
    /// Fails on an empty or duplicated component list, and on a lat/lon
    /// field reference, which needs [`with_reference_model`](Self::with_reference_model).
    pub fn new(
        solver: K,
        components: Vec<Component>,
        reference: FieldReference,
    ) -> Result<Self, MagneticsError> {
        Self::build(solver, components, reference, None)
    }

    /// Sets up a forward operator, resolving a lat/lon field reference
    /// through the given reference-field model.
    ///
    /// # Errors
    ///
    /// Fails on an empty or duplicated component list.
    pub fn with_reference_model(
        solver: K,
        components: Vec<Component>,
        reference: FieldReference,
        model: &dyn ReferenceFieldModel,
    ) -> Result<Self, MagneticsError> {
        Self::build(solver, components, reference, Some(model))
    }

    fn build(
        solver: K,
        components: Vec<Component>,
        reference: FieldReference,
        model: Option<&dyn ReferenceFieldModel>,
    ) -> Result<Self, MagneticsError> {
        validate_components(&components)?;
        let field = resolve(&reference, model)?;
        Ok(Self {
            geometry: None,
            points: None,
            components,
            field,
            solver,
            cache: None,
        })
    }

    /// Replaces the source geometry and drops any cached kernel.
    pub fn set_geometry(&mut self, geometry: G) {
        self.geometry = Some(geometry);
        self.cache = None;
    }

    /// Replaces the observation points and drops any cached kernel.
    ///
    /// Points are rows of `(x east, y north, z elevation)` in survey
    /// coordinates; their order defines the row order of each response block.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NotThreeColumns`] unless the table has
    /// exactly three columns.
    pub fn set_points(&mut self, points: Array2<f64>) -> Result<(), MagneticsError> {
        if points.ncols() != 3 {
            return Err(GeometryError::NotThreeColumns {
                found: points.ncols(),
            }
            .into());
        }
        self.points = Some(points);
        self.cache = None;
        Ok(())
    }

    /// The requested components, in block stacking order.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// The resolved ambient field parameterization.
    #[must_use]
    pub fn field(&self) -> &FieldVector {
        &self.field
    }

    /// True once the kernel has been computed and the operator assembled.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cache.is_some()
    }

    /// The cached sensitivity tensor, if the kernel has been computed.
    #[must_use]
    pub fn sensitivity(&self) -> Option<&Array3<f64>> {
        self.cache.as_ref().map(|cache| &cache.sensitivity)
    }

    /// Explicitly computes the kernel and assembles the block Jacobian.
    ///
    /// Responses trigger this lazily; calling it up front merely moves the
    /// cost, never the results.
    ///
    /// # Errors
    ///
    /// Fails when geometry or points are missing, when the kernel solver
    /// fails, or when the returned tensor violates the shape contract.
    pub fn compute_kernel(&mut self) -> Result<(), MagneticsError> {
        let cache = self.build_cache()?;
        self.cache = Some(cache);
        Ok(())
    }

    /// The assembled block Jacobian, computing it first if necessary.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`compute_kernel`](Self::compute_kernel).
    pub fn jacobian_operator(&mut self) -> Result<&BlockOperator, MagneticsError> {
        Ok(&self.ensure_ready()?.jacobian)
    }

    fn ensure_ready(&mut self) -> Result<&Cache, MagneticsError> {
        let cache = match self.cache.take() {
            Some(cache) => cache,
            None => self.build_cache()?,
        };
        Ok(self.cache.insert(cache))
    }

    fn build_cache(&self) -> Result<Cache, MagneticsError> {
        let geometry = self.geometry.as_ref().ok_or(MagneticsError::MissingGeometry)?;
        let points = self.points.as_ref().ok_or(MagneticsError::MissingPoints)?;

        let ned = sensors_to_ned(&points.view());
        let sensitivity = self
            .solver
            .compute(geometry, ned.view(), &self.field, &self.components)
            .map_err(|error| MagneticsError::Kernel(Box::new(error)))?;

        let expected = (points.nrows(), self.components.len(), geometry.cell_count());
        if sensitivity.dim() != expected {
            return Err(MagneticsError::KernelShape {
                expected,
                found: sensitivity.dim(),
            });
        }

        Ok(Cache {
            jacobian: BlockOperator::from_component_tensor(sensitivity.view()),
            sensitivity,
        })
    }
}

impl<G, K> ForwardOperator for MagneticsModel<G, K>
where
    G: SourceGeometry,
    K: SensitivityKernel<G>,
{
    type Error = MagneticsError;

    fn response(&mut self, model: ArrayView1<'_, f64>) -> Result<Array1<f64>, MagneticsError> {
        let operator = &self.ensure_ready()?.jacobian;
        Ok(operator.dot(model)?)
    }

    /// The problem is linear; the cached operator is returned unchanged for
    /// every `model`.
    fn jacobian(&mut self, _model: ArrayView1<'_, f64>) -> Result<&BlockOperator, MagneticsError> {
        self.jacobian_operator()
    }
}

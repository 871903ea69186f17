use thiserror::Error;

use crate::support::{
    block::BlockOperatorError, component::ComponentListError, field::FieldError,
    geometry::GeometryError,
};

/// Errors returned by the magnetics forward operator.
#[derive(Debug, Error)]
pub enum MagneticsError {
    /// The ambient field reference could not be resolved.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// The requested component list is unusable.
    #[error(transparent)]
    Components(#[from] ComponentListError),

    /// The observation point table is malformed.
    #[error(transparent)]
    Points(#[from] GeometryError),

    /// A response was requested before a geometry was set.
    #[error("no geometry set; supply one with set_geometry before requesting a response")]
    MissingGeometry,

    /// A response was requested before observation points were set.
    #[error("no observation points set; supply them with set_points before requesting a response")]
    MissingPoints,

    /// The kernel solver failed.
    #[error("kernel solver failed")]
    Kernel(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The kernel solver returned a tensor whose shape violates its contract.
    ///
    /// Shapes are `(observations, components, cells)`. Mismatches are never
    /// truncated or padded away.
    #[error("kernel tensor shape {found:?} does not match (observations, components, cells) {expected:?}")]
    KernelShape {
        expected: (usize, usize, usize),
        found: (usize, usize, usize),
    },

    /// Applying the assembled operator failed, e.g. a model vector whose
    /// length disagrees with the cell count.
    #[error(transparent)]
    Operator(#[from] BlockOperatorError),
}

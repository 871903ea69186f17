//! Magnetic dipole fields and a dipole-based kernel solver.
//!
//! [`dipole_field`] and [`line_dipole_field`] evaluate the anomaly of a point
//! (sphere) or line (cylinder) source at a set of positions. [`DipoleKernel`]
//! builds on them to provide a self-contained [`SensitivityKernel`]: each
//! source cell is approximated as a point dipole magnetized along the ambient
//! field. The approximation is accurate when receivers are far from the cells
//! relative to the cell size, and doubles as a reference solver in tests.

use std::f64::consts::PI;

use ndarray::{Array2, Array3, ArrayView2};
use thiserror::Error;

use crate::support::{
    component::Component, field::FieldVector, geometry::SourceGeometry, kernel::SensitivityKernel,
};

/// Vacuum permeability in SI units (T·m/A).
pub const MU_0: f64 = 4.0e-7 * PI;

fn norm3(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

fn field_rows(
    source: [f64; 3],
    moment: [f64; 3],
    points: ArrayView2<'_, f64>,
    cylinder: bool,
) -> Array2<f64> {
    let magnitude = norm3(moment);
    let mut out = Array2::zeros((points.nrows(), 3));
    if magnitude == 0.0 {
        return out;
    }
    let unit = [
        moment[0] / magnitude,
        moment[1] / magnitude,
        moment[2] / magnitude,
    ];
    for (i, point) in points.rows().into_iter().enumerate() {
        let offset = [
            point[0] - source[0],
            point[1] - source[1],
            point[2] - source[2],
        ];
        let r = norm3(offset);
        let radial = [offset[0] / r, offset[1] / r, offset[2] / r];
        let projection = radial[0] * unit[0] + radial[1] * unit[1] + radial[2] * unit[2];
        let (gain, factor) = if cylinder {
            (2.0, MU_0 * magnitude / (2.0 * PI * r * r))
        } else {
            (3.0, MU_0 * magnitude / (4.0 * PI * r * r * r))
        };
        for k in 0..3 {
            out[[i, k]] = factor * (gain * projection * radial[k] - unit[k]);
        }
    }
    out
}

/// Field of a point dipole (sphere source), in tesla.
///
/// `source` and `points` share one Cartesian frame; `moment` is the dipole
/// moment in A·m². Returns one field row per point. Points must not coincide
/// with the source.
#[must_use]
pub fn dipole_field(source: [f64; 3], moment: [f64; 3], points: ArrayView2<'_, f64>) -> Array2<f64> {
    field_rows(source, moment, points, false)
}

/// Field of a line dipole (cylinder source), in tesla.
///
/// Same conventions as [`dipole_field`] with the moment given per unit
/// length; the field decays as `1/r²` instead of `1/r³`.
#[must_use]
pub fn line_dipole_field(
    source: [f64; 3],
    moment: [f64; 3],
    points: ArrayView2<'_, f64>,
) -> Array2<f64> {
    field_rows(source, moment, points, true)
}

/// Errors returned by the dipole kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DipoleKernelError {
    /// The dipole approximation only provides magnetic field components and
    /// the total-field anomaly.
    #[error("dipole kernel cannot compute component {0}")]
    Unsupported(Component),

    /// Induced magnetization is undefined for a null ambient field.
    #[error("dipole kernel needs a non-null ambient field")]
    NullField,
}

/// A sensitivity kernel approximating each source cell as a point dipole.
///
/// A unit property (susceptibility) change in a cell of volume `V` induces
/// the dipole moment `m = V·B/μ0` along the ambient field `B`. Sensitivities
/// are returned in nanotesla per unit property. Supports `Bx`, `By`, `Bz`
/// and `TFA`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DipoleKernel {
    cell_volume: f64,
}

impl DipoleKernel {
    /// A kernel with a uniform source-cell volume in m³.
    #[must_use]
    pub fn new(cell_volume: f64) -> Self {
        Self { cell_volume }
    }
}

impl<G: SourceGeometry> SensitivityKernel<G> for DipoleKernel {
    type Error = DipoleKernelError;

    fn compute(
        &self,
        geometry: &G,
        points: ArrayView2<'_, f64>,
        field: &FieldVector,
        components: &[Component],
    ) -> Result<Array3<f64>, Self::Error> {
        if let Some(unsupported) = components.iter().find(|component| {
            !matches!(
                component,
                Component::Bx | Component::By | Component::Bz | Component::Tfa
            )
        }) {
            return Err(DipoleKernelError::Unsupported(*unsupported));
        }
        let direction = field.direction();
        if direction == [0.0, 0.0, 0.0] {
            return Err(DipoleKernelError::NullField);
        }

        // Tesla moment per unit susceptibility; ambient field comes in nT.
        let moment_magnitude = self.cell_volume * field.intensity() * 1e-9 / MU_0;
        let moment = [
            moment_magnitude * direction[0],
            moment_magnitude * direction[1],
            moment_magnitude * direction[2],
        ];

        let centers = geometry.ned_cell_centers();
        let mut tensor = Array3::zeros((points.nrows(), components.len(), geometry.cell_count()));
        for (cell, center) in centers.rows().into_iter().enumerate() {
            let anomaly = dipole_field([center[0], center[1], center[2]], moment, points);
            for (obs, row) in anomaly.rows().into_iter().enumerate() {
                for (slot, component) in components.iter().enumerate() {
                    let tesla = match component {
                        Component::Bx => row[0],
                        Component::By => row[1],
                        Component::Bz => row[2],
                        Component::Tfa => {
                            row[0] * direction[0] + row[1] * direction[1] + row[2] * direction[2]
                        }
                        _ => 0.0,
                    };
                    tensor[[obs, slot, cell]] = tesla * 1e9;
                }
            }
        }
        Ok(tensor)
    }
}

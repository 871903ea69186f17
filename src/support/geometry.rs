//! Source geometry contract and coordinate conventions.
//!
//! Mesh construction lives outside this crate. Forward operators only need a
//! view of the discretized source domain in north-east-down (NED) coordinates,
//! expressed through [`SourceGeometry`]. Receiver positions arrive in survey
//! coordinates (x east, y north, z elevation) and are converted with
//! [`sensors_to_ned`] before reaching a kernel solver.

use ndarray::{Array2, ArrayView2, s};
use thiserror::Error;

/// A discretized source domain viewed in NED coordinates.
pub trait SourceGeometry {
    /// Number of source cells.
    fn cell_count(&self) -> usize;

    /// Cell reference coordinates, one row per cell, ordered north, east,
    /// down (down-positive).
    fn ned_cell_centers(&self) -> ArrayView2<'_, f64>;
}

impl<G: SourceGeometry + ?Sized> SourceGeometry for &G {
    fn cell_count(&self) -> usize {
        (**self).cell_count()
    }

    fn ned_cell_centers(&self) -> ArrayView2<'_, f64> {
        (**self).ned_cell_centers()
    }
}

/// An error returned when a coordinate table is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// Coordinates must come as rows of three values.
    #[error("coordinate table must have 3 columns, got {found}")]
    NotThreeColumns { found: usize },
}

/// A minimal geometry backed by an owned table of NED cell centers.
///
/// This is what meshes reduce to at the core boundary; richer mesh types
/// implement [`SourceGeometry`] directly.
#[derive(Debug, Clone, PartialEq)]
pub struct CellCenters {
    centers: Array2<f64>,
}

impl CellCenters {
    /// Wraps an `(n, 3)` table of NED cell centers.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NotThreeColumns`] unless the table has
    /// exactly three columns.
    pub fn new(centers: Array2<f64>) -> Result<Self, GeometryError> {
        if centers.ncols() != 3 {
            return Err(GeometryError::NotThreeColumns {
                found: centers.ncols(),
            });
        }
        Ok(Self { centers })
    }
}

impl SourceGeometry for CellCenters {
    fn cell_count(&self) -> usize {
        self.centers.nrows()
    }

    fn ned_cell_centers(&self) -> ArrayView2<'_, f64> {
        self.centers.view()
    }
}

/// Converts receiver positions from survey coordinates to NED.
///
/// Survey rows are `(x east, y north, z elevation)`; the result swaps the
/// horizontal axes and forces a non-positive down coordinate, keeping
/// receivers at or above the surface regardless of the sign convention the
/// survey used for elevation.
#[must_use]
pub fn sensors_to_ned(points: &ArrayView2<'_, f64>) -> Array2<f64> {
    let mut ned = Array2::zeros((points.nrows(), 3));
    ned.slice_mut(s![.., 0]).assign(&points.slice(s![.., 1]));
    ned.slice_mut(s![.., 1]).assign(&points.slice(s![.., 0]));
    for (target, source) in ned
        .slice_mut(s![.., 2])
        .iter_mut()
        .zip(points.slice(s![.., 2]).iter())
    {
        *target = -source.abs();
    }
    ned
}

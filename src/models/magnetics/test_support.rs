//! Deterministic kernels and fixtures for magnetics tests.

use std::{cell::Cell, convert::Infallible};

use ndarray::{Array2, Array3, ArrayView2};

use crate::support::{
    component::Component,
    field::FieldVector,
    geometry::{CellCenters, SourceGeometry},
    kernel::SensitivityKernel,
};

/// The sensitivity a [`CountingKernel`] assigns to `(obs, comp, cell)`.
pub(super) fn sensitivity_value(obs: usize, comp: usize, cell: usize) -> f64 {
    (100 * (obs + 1) + 10 * comp) as f64 + cell as f64 * 0.5
}

/// A kernel producing [`sensitivity_value`] entries and counting invocations.
#[derive(Debug, Default)]
pub(super) struct CountingKernel {
    pub(super) calls: Cell<usize>,
}

impl CountingKernel {
    pub(super) fn new() -> Self {
        Self::default()
    }
}

impl<G: SourceGeometry> SensitivityKernel<G> for CountingKernel {
    type Error = Infallible;

    fn compute(
        &self,
        geometry: &G,
        points: ArrayView2<'_, f64>,
        _field: &FieldVector,
        components: &[Component],
    ) -> Result<Array3<f64>, Self::Error> {
        self.calls.set(self.calls.get() + 1);
        let mut tensor = Array3::zeros((points.nrows(), components.len(), geometry.cell_count()));
        for ((obs, comp, cell), entry) in tensor.indexed_iter_mut() {
            *entry = sensitivity_value(obs, comp, cell);
        }
        Ok(tensor)
    }
}

/// A kernel returning a tensor with one cell column too few.
#[derive(Debug, Default)]
pub(super) struct TruncatingKernel;

impl<G: SourceGeometry> SensitivityKernel<G> for TruncatingKernel {
    type Error = Infallible;

    fn compute(
        &self,
        geometry: &G,
        points: ArrayView2<'_, f64>,
        _field: &FieldVector,
        components: &[Component],
    ) -> Result<Array3<f64>, Self::Error> {
        Ok(Array3::zeros((
            points.nrows(),
            components.len(),
            geometry.cell_count() - 1,
        )))
    }
}

/// A row of `cells` unit cells at 10 m depth.
pub(super) fn grid(cells: usize) -> CellCenters {
    let mut centers = Array2::zeros((cells, 3));
    for (i, mut row) in centers.rows_mut().into_iter().enumerate() {
        row[0] = i as f64;
        row[2] = 10.0;
    }
    CellCenters::new(centers).expect("three columns by construction")
}

/// A profile of `n` receivers 2 m above the surface.
pub(super) fn receivers(n: usize) -> Array2<f64> {
    let mut points = Array2::zeros((n, 3));
    for (i, mut row) in points.rows_mut().into_iter().enumerate() {
        row[0] = i as f64;
        row[2] = 2.0;
    }
    points
}

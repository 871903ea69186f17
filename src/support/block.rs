//! Block-structured linear operators.
//!
//! A [`BlockOperator`] represents a matrix logically partitioned into dense
//! sub-blocks, each anchored at a row/column offset. Stacked sensitivities
//! use one block per response component, all sharing the column space of the
//! model parameters, so the full operator has shape
//! `(components · observations, cells)`.
//!
//! The representation is an explicit block list plus a computed total shape;
//! matrix-vector products loop over the blocks, accumulating into the
//! corresponding output segments. Blocks are pure scaling operators with no
//! constant term, so a zero input always maps to a zero output.

use ndarray::{Array1, Array2, ArrayView1, ArrayView3, Axis, s};
use thiserror::Error;

/// A dense sub-block anchored at a row/column offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    row_offset: usize,
    col_offset: usize,
    values: Array2<f64>,
}

impl Block {
    /// First operator row this block occupies.
    #[must_use]
    pub fn row_offset(&self) -> usize {
        self.row_offset
    }

    /// First operator column this block occupies.
    #[must_use]
    pub fn col_offset(&self) -> usize {
        self.col_offset
    }

    /// The dense block entries.
    #[must_use]
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }
}

/// Errors that can occur while assembling or applying a block operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BlockOperatorError {
    /// Component blocks must share one column space; mismatches are a
    /// contract violation and are never truncated or padded away.
    #[error("component block {index} has {found} columns, expected {expected}")]
    ShapeMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// A vector passed to a product has the wrong length.
    #[error("vector length {found} does not match operator dimension {expected}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// A matrix composed of dense sub-blocks at fixed offsets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockOperator {
    blocks: Vec<Block>,
    rows: usize,
    cols: usize,
}

impl BlockOperator {
    /// An empty operator with no blocks and zero extent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stacks per-component sensitivity blocks vertically over a shared
    /// column space.
    ///
    /// Block `i` lands at row offset `i · rows(block 0)`, column offset 0.
    ///
    /// # Errors
    ///
    /// Returns [`BlockOperatorError::ShapeMismatch`] when any block's column
    /// count disagrees with the first block's.
    pub fn from_component_blocks(blocks: Vec<Array2<f64>>) -> Result<Self, BlockOperatorError> {
        let mut operator = Self::new();
        let mut row_offset = 0;
        for (index, values) in blocks.into_iter().enumerate() {
            if let Some(first) = operator.blocks.first() {
                if values.ncols() != first.values.ncols() {
                    return Err(BlockOperatorError::ShapeMismatch {
                        index,
                        expected: first.values.ncols(),
                        found: values.ncols(),
                    });
                }
            }
            let nrows = values.nrows();
            operator.add_block(row_offset, 0, values);
            row_offset += nrows;
        }
        operator.recalc_shape();
        Ok(operator)
    }

    /// Slices a sensitivity tensor indexed `(observation, component, cell)`
    /// into per-component blocks and stacks them in component order.
    #[must_use]
    pub fn from_component_tensor(tensor: ArrayView3<'_, f64>) -> Self {
        let mut operator = Self::new();
        let observations = tensor.len_of(Axis(0));
        for index in 0..tensor.len_of(Axis(1)) {
            let slice = tensor.index_axis(Axis(1), index).to_owned();
            operator.add_block(index * observations, 0, slice);
        }
        operator.recalc_shape();
        operator
    }

    /// Registers a block at the given offsets.
    ///
    /// Call [`recalc_shape`](Self::recalc_shape) once all blocks are
    /// registered; products use the computed total shape.
    pub fn add_block(&mut self, row_offset: usize, col_offset: usize, values: Array2<f64>) {
        self.blocks.push(Block {
            row_offset,
            col_offset,
            values,
        });
    }

    /// Recomputes the total operator shape from the registered blocks.
    pub fn recalc_shape(&mut self) {
        self.rows = self
            .blocks
            .iter()
            .map(|block| block.row_offset + block.values.nrows())
            .max()
            .unwrap_or(0);
        self.cols = self
            .blocks
            .iter()
            .map(|block| block.col_offset + block.values.ncols())
            .max()
            .unwrap_or(0);
    }

    /// Total row count.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total column count.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total shape as `(rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// The registered blocks, in registration order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// The matrix-vector product `A · x`.
    ///
    /// # Errors
    ///
    /// Returns [`BlockOperatorError::DimensionMismatch`] when `x` does not
    /// match the operator's column count.
    pub fn dot(&self, x: ArrayView1<'_, f64>) -> Result<Array1<f64>, BlockOperatorError> {
        if x.len() != self.cols {
            return Err(BlockOperatorError::DimensionMismatch {
                expected: self.cols,
                found: x.len(),
            });
        }
        let mut out = Array1::zeros(self.rows);
        for block in &self.blocks {
            let cols = block.col_offset..block.col_offset + block.values.ncols();
            let rows = block.row_offset..block.row_offset + block.values.nrows();
            let contribution = block.values.dot(&x.slice(s![cols]));
            let mut segment = out.slice_mut(s![rows]);
            segment += &contribution;
        }
        Ok(out)
    }

    /// The adjoint product `Aᵀ · y`, as needed by least-squares consumers.
    ///
    /// # Errors
    ///
    /// Returns [`BlockOperatorError::DimensionMismatch`] when `y` does not
    /// match the operator's row count.
    pub fn transposed_dot(&self, y: ArrayView1<'_, f64>) -> Result<Array1<f64>, BlockOperatorError> {
        if y.len() != self.rows {
            return Err(BlockOperatorError::DimensionMismatch {
                expected: self.rows,
                found: y.len(),
            });
        }
        let mut out = Array1::zeros(self.cols);
        for block in &self.blocks {
            let rows = block.row_offset..block.row_offset + block.values.nrows();
            let cols = block.col_offset..block.col_offset + block.values.ncols();
            let contribution = block.values.t().dot(&y.slice(s![rows]));
            let mut segment = out.slice_mut(s![cols]);
            segment += &contribution;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::{Array3, array};

    fn two_block_operator() -> BlockOperator {
        let top = array![[1.0, 2.0], [3.0, 4.0]];
        let bottom = array![[5.0, 6.0], [7.0, 8.0]];
        BlockOperator::from_component_blocks(vec![top, bottom]).unwrap()
    }

    #[test]
    fn stacking_computes_total_shape() {
        let operator = two_block_operator();
        assert_eq!(operator.shape(), (4, 2));
        let offsets: Vec<usize> = operator.blocks().map(Block::row_offset).collect();
        assert_eq!(offsets, vec![0, 2]);
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let error = BlockOperator::from_component_blocks(vec![
            Array2::zeros((2, 3)),
            Array2::zeros((2, 4)),
        ])
        .unwrap_err();
        assert_eq!(
            error,
            BlockOperatorError::ShapeMismatch {
                index: 1,
                expected: 3,
                found: 4,
            }
        );
    }

    #[test]
    fn zero_input_maps_to_zero_output() {
        let operator = two_block_operator();
        let out = operator.dot(Array1::zeros(2).view()).unwrap();
        assert_eq!(out, Array1::zeros(4));
    }

    #[test]
    fn dot_accumulates_per_block_segments() {
        let operator = two_block_operator();
        let out = operator.dot(array![1.0, -1.0].view()).unwrap();
        assert_relative_eq!(out, array![-1.0, -1.0, -1.0, -1.0], max_relative = 1e-12);
    }

    #[test]
    fn wrong_model_length_is_rejected() {
        let operator = two_block_operator();
        let error = operator.dot(Array1::zeros(3).view()).unwrap_err();
        assert_eq!(
            error,
            BlockOperatorError::DimensionMismatch {
                expected: 2,
                found: 3,
            }
        );
    }

    #[test]
    fn transposed_dot_matches_dense_transpose() {
        let operator = two_block_operator();
        let y = array![1.0, 0.5, -1.0, 2.0];
        let out = operator.transposed_dot(y.view()).unwrap();
        // Dense equivalent: rows of the stacked matrix weighted by y.
        let expected = array![
            1.0 * 1.0 + 0.5 * 3.0 - 1.0 * 5.0 + 2.0 * 7.0,
            1.0 * 2.0 + 0.5 * 4.0 - 1.0 * 6.0 + 2.0 * 8.0,
        ];
        assert_relative_eq!(out, expected, max_relative = 1e-12);
    }

    #[test]
    fn transposed_dot_rejects_wrong_data_length() {
        let operator = two_block_operator();
        let error = operator.transposed_dot(Array1::zeros(5).view()).unwrap_err();
        assert_eq!(
            error,
            BlockOperatorError::DimensionMismatch {
                expected: 4,
                found: 5,
            }
        );
    }

    #[test]
    fn tensor_assembly_places_component_slices() {
        // 2 observations, 2 components, 3 cells.
        let mut tensor = Array3::zeros((2, 2, 3));
        for obs in 0..2 {
            for comp in 0..2 {
                for cell in 0..3 {
                    tensor[[obs, comp, cell]] =
                        100.0 * comp as f64 + 10.0 * obs as f64 + cell as f64;
                }
            }
        }
        let operator = BlockOperator::from_component_tensor(tensor.view());
        assert_eq!(operator.shape(), (4, 3));

        let blocks: Vec<&Block> = operator.blocks().collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].row_offset(), 0);
        assert_eq!(blocks[1].row_offset(), 2);
        assert_eq!(blocks[0].col_offset(), 0);
        assert_eq!(blocks[1].col_offset(), 0);
        assert_eq!(*blocks[0].values(), array![[0.0, 1.0, 2.0], [10.0, 11.0, 12.0]]);
        assert_eq!(
            *blocks[1].values(),
            array![[100.0, 101.0, 102.0], [110.0, 111.0, 112.0]]
        );
    }

    #[test]
    fn empty_operator_has_zero_extent() {
        let operator = BlockOperator::new();
        assert_eq!(operator.shape(), (0, 0));
        let out = operator.dot(Array1::zeros(0).view()).unwrap();
        assert_eq!(out.len(), 0);
    }
}

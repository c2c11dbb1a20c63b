//! Element capability interfaces and the 9-node brick implementation.

use crate::error::{ElementError, Result};
use crate::nodes::{NodeRef, NodeStore};
use nalgebra::{DMatrix, DVector, Vector3};

pub mod brick9;
pub mod shape;

pub use brick9::{Brick9, CoordMatrix, ElementMatrix, ElementState, ElementVector};
pub use shape::{ShapeDerivatives, ShapeFunctions, ShapeRow};

/// A contiguous block of element DOFs owned by one node
///
/// Block width is data rather than a per-type special case: position nodes
/// carry 3 DOFs, curvature nodes 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DofBlock {
    /// Node owning the block
    pub node: NodeRef,
    /// Offset of the block inside the element vector
    pub local_offset: usize,
    /// Number of DOFs in the block
    pub width: usize,
}

/// Element interface used by the host solver
pub trait Element {
    /// Number of nodes referenced by the element
    fn num_nodes(&self) -> usize;

    /// Total number of element DOFs
    fn num_dofs(&self) -> usize;

    /// Number of DOFs of the n-th node
    fn node_dofs(&self, n: usize) -> usize;

    /// DOF blocks in element order
    ///
    /// # Errors
    /// Returns [`ElementError::NodesNotSet`] if the nodes are not bound yet
    fn dof_blocks(&self) -> Result<Vec<DofBlock>>;

    /// Number of DOF sub-blocks (one per node)
    fn sub_blocks(&self) -> usize {
        self.num_nodes()
    }

    /// Size of the i-th sub-block
    fn sub_block_size(&self, block: usize) -> usize {
        self.node_dofs(block)
    }

    /// Offset of the i-th sub-block in the host's global state vector
    fn sub_block_offset(&self, nodes: &NodeStore, block: usize) -> Result<usize> {
        let blocks = self.dof_blocks()?;
        let dof_block = blocks.get(block).ok_or(ElementError::InvalidBlock {
            index: block,
            count: blocks.len(),
        })?;
        nodes.offset(dof_block.node)
    }

    /// Global DOF indices of every element DOF, in element order
    fn global_dof_indices(&self, nodes: &NodeStore) -> Result<Vec<usize>> {
        let mut indices = Vec::with_capacity(self.num_dofs());
        for block in self.dof_blocks()? {
            let base = nodes.offset(block.node)?;
            indices.extend(base..base + block.width);
        }
        Ok(indices)
    }

    /// One-time initialization: fixes the reference configuration and the
    /// constant mass matrix
    fn setup(&mut self, nodes: &NodeStore, gravity: &Vector3<f64>) -> Result<()>;

    /// Refresh the current coordinates and velocities from the nodes
    fn update(&mut self, nodes: &NodeStore) -> Result<()>;

    /// Write the element mass matrix into `out`
    fn compute_mass_matrix_into(&self, out: &mut DMatrix<f64>) -> Result<()>;

    /// Write the element internal force vector into `out`
    fn compute_internal_forces_into(&self, out: &mut DVector<f64>) -> Result<()>;

    /// Write `kfactor·K + rfactor·R + mfactor·M` into `out`
    fn compute_tangent_matrix_into(
        &self,
        out: &mut DMatrix<f64>,
        kfactor: f64,
        rfactor: f64,
        mfactor: f64,
    ) -> Result<()>;
}

/// Elements that can receive loads distributed over their volume
pub trait VolumeLoadable {
    /// Number of components of the interpolated field
    fn field_ncoords(&self) -> usize;

    /// Number of position-level DOFs
    fn ndof_x(&self) -> usize;

    /// Number of velocity-level DOFs
    fn ndof_w(&self) -> usize;

    /// All position-level DOFs packed in one vector
    fn state_block_x(&self, nodes: &NodeStore) -> Result<DVector<f64>>;

    /// All velocity-level DOFs packed in one vector
    fn state_block_w(&self, nodes: &NodeStore) -> Result<DVector<f64>>;

    /// Evaluate Nᵀ·F at parametric point (u, v, w) ∈ [-1, 1]³
    ///
    /// Returns the generalized load and det[J] at that point, for use in
    /// the caller's own quadrature.
    fn compute_nf(&self, u: f64, v: f64, w: f64, f: &DVector<f64>) -> Result<(DVector<f64>, f64)>;

    /// Material density
    fn density(&self) -> Result<f64>;
}

pub(crate) fn check_matrix_shape(out: &DMatrix<f64>, rows: usize, cols: usize, what: &'static str) -> Result<()> {
    if out.shape() != (rows, cols) {
        return Err(ElementError::DimensionMismatch {
            what,
            expected: (rows, cols),
            found: out.shape(),
        });
    }
    Ok(())
}

pub(crate) fn check_vector_len(out: &DVector<f64>, len: usize, what: &'static str) -> Result<()> {
    if out.len() != len {
        return Err(ElementError::DimensionMismatch {
            what,
            expected: (len, 1),
            found: (out.len(), 1),
        });
    }
    Ok(())
}

//! Node storage shared between the host model and its elements.
//!
//! Nodes are owned by a [`NodeStore`]; elements only keep typed handles into
//! it and read node state through a shared borrow during evaluation. Two node
//! kinds exist: position nodes with 3 DOFs and curvature nodes with 9 DOFs.

use crate::error::{ElementError, Result};
use nalgebra::Vector3;

/// Handle to a position (xyz) node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct XyzNodeId(pub usize);

/// Handle to a curvature node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurvNodeId(pub usize);

/// Either kind of node handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Xyz(XyzNodeId),
    Curv(CurvNodeId),
}

/// A position node: 3 DOFs (x, y, z)
#[derive(Debug, Clone, PartialEq)]
pub struct NodeXyz {
    /// Current position
    pub pos: Vector3<f64>,
    /// Current velocity
    pub pos_dt: Vector3<f64>,
    /// Offset of the first DOF in the host's global state vector
    pub offset: usize,
}

impl NodeXyz {
    pub fn new(pos: Vector3<f64>, offset: usize) -> Self {
        Self {
            pos,
            pos_dt: Vector3::zeros(),
            offset,
        }
    }
}

/// A curvature node: 9 DOFs (∂²r/∂x², ∂²r/∂y², ∂²r/∂z²)
#[derive(Debug, Clone, PartialEq)]
pub struct NodeCurv {
    pub rxx: Vector3<f64>,
    pub ryy: Vector3<f64>,
    pub rzz: Vector3<f64>,
    pub rxx_dt: Vector3<f64>,
    pub ryy_dt: Vector3<f64>,
    pub rzz_dt: Vector3<f64>,
    /// Offset of the first DOF in the host's global state vector
    pub offset: usize,
}

impl NodeCurv {
    pub fn new(rxx: Vector3<f64>, ryy: Vector3<f64>, rzz: Vector3<f64>, offset: usize) -> Self {
        Self {
            rxx,
            ryy,
            rzz,
            rxx_dt: Vector3::zeros(),
            ryy_dt: Vector3::zeros(),
            rzz_dt: Vector3::zeros(),
            offset,
        }
    }

    /// Curvature vectors in row order (xx, yy, zz)
    pub fn curvatures(&self) -> [Vector3<f64>; 3] {
        [self.rxx, self.ryy, self.rzz]
    }

    /// Curvature rates in row order (xx, yy, zz)
    pub fn curvature_rates(&self) -> [Vector3<f64>; 3] {
        [self.rxx_dt, self.ryy_dt, self.rzz_dt]
    }
}

/// Host-owned collection of nodes
///
/// Global offsets are handed out in insertion order: 3 per position node,
/// 9 per curvature node.
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    xyz: Vec<NodeXyz>,
    curv: Vec<NodeCurv>,
    num_dofs: usize,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a position node at rest
    pub fn add_xyz(&mut self, pos: Vector3<f64>) -> XyzNodeId {
        let id = XyzNodeId(self.xyz.len());
        self.xyz.push(NodeXyz::new(pos, self.num_dofs));
        self.num_dofs += 3;
        id
    }

    /// Add a curvature node at rest
    pub fn add_curv(&mut self, rxx: Vector3<f64>, ryy: Vector3<f64>, rzz: Vector3<f64>) -> CurvNodeId {
        let id = CurvNodeId(self.curv.len());
        self.curv.push(NodeCurv::new(rxx, ryy, rzz, self.num_dofs));
        self.num_dofs += 9;
        id
    }

    /// Add a curvature node with zero curvature
    pub fn add_curv_zero(&mut self) -> CurvNodeId {
        self.add_curv(Vector3::zeros(), Vector3::zeros(), Vector3::zeros())
    }

    pub fn xyz(&self, id: XyzNodeId) -> Result<&NodeXyz> {
        self.xyz.get(id.0).ok_or(ElementError::NodeNotFound {
            kind: "xyz",
            index: id.0,
        })
    }

    pub fn xyz_mut(&mut self, id: XyzNodeId) -> Result<&mut NodeXyz> {
        self.xyz.get_mut(id.0).ok_or(ElementError::NodeNotFound {
            kind: "xyz",
            index: id.0,
        })
    }

    pub fn curv(&self, id: CurvNodeId) -> Result<&NodeCurv> {
        self.curv.get(id.0).ok_or(ElementError::NodeNotFound {
            kind: "curvature",
            index: id.0,
        })
    }

    pub fn curv_mut(&mut self, id: CurvNodeId) -> Result<&mut NodeCurv> {
        self.curv.get_mut(id.0).ok_or(ElementError::NodeNotFound {
            kind: "curvature",
            index: id.0,
        })
    }

    /// Global offset of any node
    pub fn offset(&self, node: NodeRef) -> Result<usize> {
        match node {
            NodeRef::Xyz(id) => Ok(self.xyz(id)?.offset),
            NodeRef::Curv(id) => Ok(self.curv(id)?.offset),
        }
    }

    pub fn num_xyz(&self) -> usize {
        self.xyz.len()
    }

    pub fn num_curv(&self) -> usize {
        self.curv.len()
    }

    /// Total number of DOFs handed out so far
    pub fn num_dofs(&self) -> usize {
        self.num_dofs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_follow_insertion_order() {
        let mut store = NodeStore::new();
        let a = store.add_xyz(Vector3::new(0.0, 0.0, 0.0));
        let c = store.add_curv_zero();
        let b = store.add_xyz(Vector3::new(1.0, 0.0, 0.0));

        assert_eq!(store.offset(NodeRef::Xyz(a)).unwrap(), 0);
        assert_eq!(store.offset(NodeRef::Curv(c)).unwrap(), 3);
        assert_eq!(store.offset(NodeRef::Xyz(b)).unwrap(), 12);
        assert_eq!(store.num_dofs(), 15);
    }

    #[test]
    fn dangling_handle_is_reported() {
        let store = NodeStore::new();
        assert_eq!(
            store.xyz(XyzNodeId(4)),
            Err(ElementError::NodeNotFound {
                kind: "xyz",
                index: 4
            })
        );
    }
}

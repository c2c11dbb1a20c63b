//! Nine-node brick element with a central curvature node.
//!
//! This crate computes, for one element instance, the quantities a host
//! dynamics solver assembles every step: the constant mass matrix and gravity
//! load, the Green-Lagrange internal force vector with optional structural
//! damping, and the tangent `Kfactor·K + Rfactor·R + Mfactor·M`.
//!
//! ```no_run
//! use brick9_solver::{Brick9, Element, Material, NodeStore};
//! use nalgebra::Vector3;
//! use std::sync::Arc;
//!
//! let mut nodes = NodeStore::new();
//! let corners = brick9_solver::elements::shape::CORNERS
//!     .map(|c| nodes.add_xyz(Vector3::new(c[0], c[1], c[2]) * 0.5));
//! let central = nodes.add_curv_zero();
//!
//! let mut elem = Brick9::new(1);
//! elem.set_nodes(corners, central)?;
//! elem.set_dimensions(Vector3::new(1.0, 1.0, 1.0))?;
//! elem.set_material(Arc::new(Material::isotropic("steel", 200e9, 0.3, 7800.0)))?;
//! elem.setup(&nodes, &Vector3::new(0.0, 0.0, -9.81))?;
//!
//! elem.update(&nodes)?;
//! let forces = elem.internal_forces()?;
//! let tangent = elem.tangent_matrix(1.0, 0.0, 0.0)?;
//! # Ok::<(), brick9_solver::ElementError>(())
//! ```

pub mod batch;
pub mod config;
pub mod elements;
pub mod error;
pub mod loads;
pub mod materials;
pub mod nodes;
pub mod postprocess;
pub mod quadrature;

pub use config::{ElementConfig, ElementDescription};
pub use elements::{
    Brick9, CoordMatrix, DofBlock, Element, ElementMatrix, ElementState, ElementVector, ShapeFunctions,
    VolumeLoadable,
};
pub use error::{ElementError, Result};
pub use loads::{gravity_load, integrate_volume_load};
pub use materials::Material;
pub use nodes::{CurvNodeId, NodeCurv, NodeRef, NodeStore, NodeXyz, XyzNodeId};
pub use postprocess::{PointResult, StrainState, StressState};
pub use quadrature::{GaussPoint, IntegrationRule};

//! Element configuration and JSON element descriptions.

use crate::elements::{Brick9, Element};
use crate::error::{ElementError, Result};
use crate::materials::Material;
use crate::nodes::NodeStore;
use crate::quadrature::IntegrationRule;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Per-element settings applied before `setup`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementConfig {
    /// Element dimensions along x, y, z
    pub dimensions: [f64; 3],
    /// Compute the internal gravity load at setup
    pub gravity_on: bool,
    /// Gravitational acceleration
    pub gravity: [f64; 3],
    /// Structural damping coefficient
    pub alpha_damp: f64,
    /// Integration rule for internal forces and tangent
    pub integration: IntegrationRule,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self {
            dimensions: [1.0, 1.0, 1.0],
            gravity_on: false,
            gravity: [0.0, 0.0, -9.81],
            alpha_damp: 0.0,
            integration: IntegrationRule::Full,
        }
    }
}

impl ElementConfig {
    pub fn gravity_vector(&self) -> Vector3<f64> {
        Vector3::from(self.gravity)
    }
}

/// Self-contained description of one element and its nodes
///
/// `corners` are the reference positions in the node order of
/// [`crate::elements::shape::CORNERS`]. `displaced` and `velocities`, when
/// present, set the current corner state after setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDescription {
    pub corners: [[f64; 3]; 8],
    /// Reference curvature vectors (xx, yy, zz)
    #[serde(default)]
    pub curvature: [[f64; 3]; 3],
    pub material: Material,
    #[serde(default)]
    pub config: ElementConfig,
    #[serde(default)]
    pub displaced: Option<[[f64; 3]; 8]>,
    #[serde(default)]
    pub velocities: Option<[[f64; 3]; 8]>,
}

impl ElementDescription {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|err| ElementError::Config(format!("{}: {}", path.display(), err)))?;
        Self::from_json(&text)
    }

    /// Create nodes, set up the element and apply the current state
    pub fn build(&self) -> Result<(NodeStore, Brick9)> {
        let mut nodes = NodeStore::new();
        let corners = self.corners.map(|c| nodes.add_xyz(Vector3::from(c)));
        let [rxx, ryy, rzz] = self.curvature.map(Vector3::from);
        let central = nodes.add_curv(rxx, ryy, rzz);

        let mut elem = Brick9::new(1);
        elem.set_nodes(corners, central)?;
        elem.set_material(Arc::new(self.material.clone()))?;
        elem.configure(&self.config)?;
        elem.setup(&nodes, &self.config.gravity_vector())?;

        if let Some(displaced) = &self.displaced {
            for (id, pos) in corners.iter().zip(displaced) {
                nodes.xyz_mut(*id)?.pos = Vector3::from(*pos);
            }
        }
        if let Some(velocities) = &self.velocities {
            for (id, vel) in corners.iter().zip(velocities) {
                nodes.xyz_mut(*id)?.pos_dt = Vector3::from(*vel);
            }
        }
        elem.update(&nodes)?;

        Ok((nodes, elem))
    }
}

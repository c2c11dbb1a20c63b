//! Linear elastic continuum material.

use crate::error::{ElementError, Result};
use nalgebra::Matrix6;
use serde::{Deserialize, Serialize};

/// A linear elastic material definition
///
/// The constitutive law is either isotropic (from `elastic_modulus` and
/// `poissons_ratio`) or given explicitly as a full 6x6 matrix in Voigt
/// order `[xx, yy, zz, xy, yz, zx]` with engineering shear strains.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Material {
    /// Material name
    pub name: String,
    /// Young's modulus (E) [Pa]
    pub elastic_modulus: Option<f64>,
    /// Poisson's ratio (ν) [-]
    pub poissons_ratio: Option<f64>,
    /// Density (ρ) [kg/m³]
    pub density: Option<f64>,
    /// Explicit constitutive matrix, row-major; overrides the isotropic law
    #[serde(default)]
    pub constitutive: Option<[[f64; 6]; 6]>,
}

impl Material {
    /// Create a new material with a given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Isotropic linear elastic material
    pub fn isotropic(name: impl Into<String>, elastic_modulus: f64, poissons_ratio: f64, density: f64) -> Self {
        Self {
            name: name.into(),
            elastic_modulus: Some(elastic_modulus),
            poissons_ratio: Some(poissons_ratio),
            density: Some(density),
            constitutive: None,
        }
    }

    /// Material with an explicit (possibly anisotropic) constitutive matrix
    pub fn with_constitutive_matrix(name: impl Into<String>, d: &Matrix6<f64>, density: f64) -> Self {
        let mut rows = [[0.0; 6]; 6];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = d[(i, j)];
            }
        }
        Self {
            name: name.into(),
            elastic_modulus: None,
            poissons_ratio: None,
            density: Some(density),
            constitutive: Some(rows),
        }
    }

    /// Get the shear modulus (G) from E and ν
    pub fn shear_modulus(&self) -> Option<f64> {
        match (self.elastic_modulus, self.poissons_ratio) {
            (Some(e), Some(nu)) => Some(e / (2.0 * (1.0 + nu))),
            _ => None,
        }
    }

    /// Density, required for mass and gravity computation
    pub fn density(&self) -> Result<f64> {
        let rho = self.density.ok_or(ElementError::MissingProperty("density"))?;
        if !(rho > 0.0) {
            return Err(ElementError::InvalidMaterial(format!(
                "{}: density must be positive, got {}",
                self.name, rho
            )));
        }
        Ok(rho)
    }

    /// Compute the 6x6 constitutive matrix D relating stress to strain: {σ} = [D]{ε}
    ///
    /// For the isotropic case:
    /// ```text
    ///       [1-ν   ν     ν     0       0       0    ]
    ///       [ν     1-ν   ν     0       0       0    ]
    ///   E   [ν     ν     1-ν   0       0       0    ]
    /// ───── [0     0     0   (1-2ν)/2  0       0    ]
    /// (1+ν)(1-2ν)
    ///       [0     0     0     0     (1-2ν)/2  0    ]
    ///       [0     0     0     0       0     (1-2ν)/2]
    /// ```
    pub fn constitutive_matrix(&self) -> Result<Matrix6<f64>> {
        if let Some(rows) = &self.constitutive {
            return Ok(Matrix6::from_fn(|i, j| rows[i][j]));
        }

        let e = self
            .elastic_modulus
            .ok_or(ElementError::MissingProperty("elastic modulus"))?;
        let nu = self
            .poissons_ratio
            .ok_or(ElementError::MissingProperty("Poisson's ratio"))?;

        if !(e > 0.0) {
            return Err(ElementError::InvalidMaterial(format!(
                "{}: elastic modulus must be positive, got {}",
                self.name, e
            )));
        }
        if !(-1.0 < nu && nu < 0.5) {
            return Err(ElementError::InvalidMaterial(format!(
                "{}: Poisson's ratio must lie in (-1, 0.5), got {}",
                self.name, nu
            )));
        }

        let factor = e / ((1.0 + nu) * (1.0 - 2.0 * nu));
        let diagonal = (1.0 - nu) * factor;
        let off_diagonal = nu * factor;
        let shear = (1.0 - 2.0 * nu) / 2.0 * factor;

        let mut d = Matrix6::zeros();
        for i in 0..3 {
            for j in 0..3 {
                d[(i, j)] = if i == j { diagonal } else { off_diagonal };
            }
            d[(i + 3, i + 3)] = shear;
        }

        Ok(d)
    }
}

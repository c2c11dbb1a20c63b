// Post-processing of integration point results
// Strain and stress states in Voigt order [xx, yy, zz, xy, yz, zx]

use nalgebra::{Matrix3, Vector6};
use serde::Serialize;

/// Stress tensor components at a material point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StressState {
    pub sxx: f64,
    pub syy: f64,
    pub szz: f64,
    pub sxy: f64,
    pub syz: f64,
    pub sxz: f64,
}

/// Green-Lagrange strain tensor components (tensorial shear) at a material point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrainState {
    pub exx: f64,
    pub eyy: f64,
    pub ezz: f64,
    pub exy: f64,
    pub eyz: f64,
    pub exz: f64,
}

impl StressState {
    pub fn from_voigt(s: &Vector6<f64>) -> Self {
        Self {
            sxx: s[0],
            syy: s[1],
            szz: s[2],
            sxy: s[3],
            syz: s[4],
            sxz: s[5],
        }
    }

    pub fn tensor(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.sxx, self.sxy, self.sxz, //
            self.sxy, self.syy, self.syz, //
            self.sxz, self.syz, self.szz,
        )
    }

    /// von Mises equivalent stress
    pub fn mises(&self) -> f64 {
        let d1 = self.sxx - self.syy;
        let d2 = self.syy - self.szz;
        let d3 = self.szz - self.sxx;
        let shear = self.sxy * self.sxy + self.syz * self.syz + self.sxz * self.sxz;
        (0.5 * (d1 * d1 + d2 * d2 + d3 * d3) + 3.0 * shear).sqrt()
    }
}

impl StrainState {
    /// Build from Voigt strains with engineering shear (γ = 2ε)
    pub fn from_voigt(e: &Vector6<f64>) -> Self {
        Self {
            exx: e[0],
            eyy: e[1],
            ezz: e[2],
            exy: 0.5 * e[3],
            eyz: 0.5 * e[4],
            exz: 0.5 * e[5],
        }
    }

    pub fn tensor(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.exx, self.exy, self.exz, //
            self.exy, self.eyy, self.eyz, //
            self.exz, self.eyz, self.ezz,
        )
    }

    /// Largest absolute component
    pub fn max_abs(&self) -> f64 {
        [self.exx, self.eyy, self.ezz, self.exy, self.eyz, self.exz]
            .iter()
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }
}

/// Strain and stress evaluated at one parametric point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointResult {
    pub point: [f64; 3],
    pub strain: StrainState,
    pub stress: StressState,
}

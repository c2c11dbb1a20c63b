//! Gauss-Legendre quadrature rules on the reference hexahedron [-1, 1]³.

use serde::{Deserialize, Serialize};

/// 2-point Gauss-Legendre abscissae and weights on [-1, 1]
pub const GAUSS_2: [(f64, f64); 2] = [(-0.577_350_269_189_625_8, 1.0), (0.577_350_269_189_625_8, 1.0)];

/// 3-point Gauss-Legendre abscissae and weights on [-1, 1]
pub const GAUSS_3: [(f64, f64); 3] = [
    (-0.774_596_669_241_483_4, 5.0 / 9.0),
    (0.0, 8.0 / 9.0),
    (0.774_596_669_241_483_4, 5.0 / 9.0),
];

/// A quadrature point with natural coordinates (ξ, η, ζ) and weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussPoint {
    pub xi: f64,
    pub eta: f64,
    pub zeta: f64,
    pub weight: f64,
}

impl GaussPoint {
    #[inline]
    pub fn coords(&self) -> [f64; 3] {
        [self.xi, self.eta, self.zeta]
    }
}

/// Tensor-product integration rule for the brick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationRule {
    /// 3×3×3 points, exact for the curvature bubble products
    #[default]
    Full,
    /// 2×2×2 points
    Reduced,
}

impl IntegrationRule {
    fn table(self) -> &'static [(f64, f64)] {
        match self {
            IntegrationRule::Full => &GAUSS_3,
            IntegrationRule::Reduced => &GAUSS_2,
        }
    }

    /// Number of points per direction
    pub fn order(self) -> usize {
        self.table().len()
    }

    /// All points of the rule, ξ varying fastest
    pub fn points(self) -> Vec<GaussPoint> {
        let table = self.table();
        let mut points = Vec::with_capacity(table.len().pow(3));
        for &(zeta, wz) in table {
            for &(eta, wy) in table {
                for &(xi, wx) in table {
                    points.push(GaussPoint {
                        xi,
                        eta,
                        zeta,
                        weight: wx * wy * wz,
                    });
                }
            }
        }
        points
    }
}

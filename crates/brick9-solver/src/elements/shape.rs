//! Shape functions of the 9-node brick.
//!
//! The eight corner weights are the standard trilinear functions. The central
//! node contributes three curvature bubbles, one per axis:
//!
//! ```text
//! N8  = a² (x² - 1) / 8
//! N9  = b² (y² - 1) / 8
//! N10 = c² (z² - 1) / 8
//! ```
//!
//! where (a, b, c) are the element dimensions. Each bubble vanishes on the two
//! faces normal to its axis and has unit second derivative with respect to the
//! physical coordinate `X = a·x/2`, so rows 8..=10 of the coordinate matrix
//! hold ∂²r/∂X², ∂²r/∂Y² and ∂²r/∂Z².

use nalgebra::{RowSVector, SMatrix, Vector3};

/// Number of interpolation terms (8 corners + 3 curvature components)
pub const NUM_SHAPE: usize = 11;

/// Interpolation row N = [N0 .. N10]
pub type ShapeRow = RowSVector<f64, NUM_SHAPE>;

/// Derivative rows [∂N/∂x; ∂N/∂y; ∂N/∂z]
pub type ShapeDerivatives = SMatrix<f64, 3, NUM_SHAPE>;

/// Natural coordinates of the corner nodes
///
/// ```text
///        7----------6
///       /|         /|
///      / |        / |
///     4----------5  |
///     |  3-------|--2
///     | /        | /
///     |/         |/
///     0----------1
/// ```
pub const CORNERS: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Shape function evaluator bound to the element dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeFunctions {
    dims: Vector3<f64>,
}

impl ShapeFunctions {
    pub fn new(dims: Vector3<f64>) -> Self {
        Self { dims }
    }

    pub fn dimensions(&self) -> &Vector3<f64> {
        &self.dims
    }

    /// Interpolation weights at (x, y, z)
    pub fn values(&self, x: f64, y: f64, z: f64) -> ShapeRow {
        let mut n = ShapeRow::zeros();
        for (i, c) in CORNERS.iter().enumerate() {
            n[i] = 0.125 * (1.0 + c[0] * x) * (1.0 + c[1] * y) * (1.0 + c[2] * z);
        }

        let (a, b, c) = (self.dims.x, self.dims.y, self.dims.z);
        n[8] = a * a * (x * x - 1.0) / 8.0;
        n[9] = b * b * (y * y - 1.0) / 8.0;
        n[10] = c * c * (z * z - 1.0) / 8.0;
        n
    }

    /// ∂N/∂x at (x, y, z)
    pub fn derivative_x(&self, x: f64, y: f64, z: f64) -> ShapeRow {
        let mut nx = ShapeRow::zeros();
        for (i, c) in CORNERS.iter().enumerate() {
            nx[i] = 0.125 * c[0] * (1.0 + c[1] * y) * (1.0 + c[2] * z);
        }
        nx[8] = self.dims.x * self.dims.x * x / 4.0;
        nx
    }

    /// ∂N/∂y at (x, y, z)
    pub fn derivative_y(&self, x: f64, y: f64, z: f64) -> ShapeRow {
        let mut ny = ShapeRow::zeros();
        for (i, c) in CORNERS.iter().enumerate() {
            ny[i] = 0.125 * (1.0 + c[0] * x) * c[1] * (1.0 + c[2] * z);
        }
        ny[9] = self.dims.y * self.dims.y * y / 4.0;
        ny
    }

    /// ∂N/∂z at (x, y, z)
    pub fn derivative_z(&self, x: f64, y: f64, z: f64) -> ShapeRow {
        let mut nz = ShapeRow::zeros();
        for (i, c) in CORNERS.iter().enumerate() {
            nz[i] = 0.125 * (1.0 + c[0] * x) * (1.0 + c[1] * y) * c[2];
        }
        nz[10] = self.dims.z * self.dims.z * z / 4.0;
        nz
    }

    /// All three derivative rows stacked
    pub fn derivatives(&self, x: f64, y: f64, z: f64) -> ShapeDerivatives {
        let mut nd = ShapeDerivatives::zeros();
        nd.set_row(0, &self.derivative_x(x, y, z));
        nd.set_row(1, &self.derivative_y(x, y, z));
        nd.set_row(2, &self.derivative_z(x, y, z));
        nd
    }

    /// Expanded form S = [N0·I3, N1·I3, ..., N10·I3] (3x33)
    pub fn expanded(&self, x: f64, y: f64, z: f64) -> SMatrix<f64, 3, 33> {
        let n = self.values(x, y, z);
        let mut s = SMatrix::<f64, 3, 33>::zeros();
        for a in 0..NUM_SHAPE {
            for i in 0..3 {
                s[(i, 3 * a + i)] = n[a];
            }
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [(f64, f64, f64); 5] = [
        (0.0, 0.0, 0.0),
        (0.5, 0.5, 0.5),
        (-0.5, 0.3, 0.7),
        (1.0, -1.0, 0.0),
        (-0.9, 0.1, -0.35),
    ];

    fn shapes() -> ShapeFunctions {
        ShapeFunctions::new(Vector3::new(1.5, 0.8, 2.0))
    }

    #[test]
    fn corner_weights_partition_of_unity() {
        let sf = shapes();
        for &(x, y, z) in &SAMPLES {
            let n = sf.values(x, y, z);
            let sum: f64 = (0..8).map(|i| n[i]).sum();
            assert!(
                (sum - 1.0).abs() < 1e-12,
                "Corner weights sum = {} at ({}, {}, {})",
                sum,
                x,
                y,
                z
            );
        }
    }

    #[test]
    fn shape_functions_at_corners() {
        let sf = shapes();
        for (i, c) in CORNERS.iter().enumerate() {
            let n = sf.values(c[0], c[1], c[2]);
            for j in 0..NUM_SHAPE {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(
                    (n[j] - expected).abs() < 1e-12,
                    "N[{}] = {} at corner {} (expected {})",
                    j,
                    n[j],
                    i,
                    expected
                );
            }
        }
    }

    #[test]
    fn curvature_terms_vanish_on_their_faces() {
        let sf = shapes();
        for &s in &[-1.0, 1.0] {
            assert_eq!(sf.values(s, 0.3, -0.2)[8], 0.0);
            assert_eq!(sf.values(0.3, s, -0.2)[9], 0.0);
            assert_eq!(sf.values(0.3, -0.2, s)[10], 0.0);
        }
    }

    #[test]
    fn curvature_terms_have_unit_physical_second_derivative() {
        // d²N8/dX² with X = a·x/2 is (2/a)² · a²/4 = 1
        let sf = shapes();
        let a = sf.dimensions().x;
        let h = 1e-3;
        let n = |x: f64| sf.values(x, 0.2, 0.1)[8];
        let second = (n(0.1 + h) - 2.0 * n(0.1) + n(0.1 - h)) / (h * h);
        let physical = second * (2.0 / a) * (2.0 / a);
        assert!((physical - 1.0).abs() < 1e-6, "got {}", physical);
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let sf = shapes();
        let h = 1e-6;
        for &(x, y, z) in &SAMPLES {
            let nd = sf.derivatives(x, y, z);
            let fd = [
                (sf.values(x + h, y, z) - sf.values(x - h, y, z)) / (2.0 * h),
                (sf.values(x, y + h, z) - sf.values(x, y - h, z)) / (2.0 * h),
                (sf.values(x, y, z + h) - sf.values(x, y, z - h)) / (2.0 * h),
            ];
            for (k, row) in fd.iter().enumerate() {
                for j in 0..NUM_SHAPE {
                    assert!(
                        (nd[(k, j)] - row[j]).abs() < 1e-8,
                        "dN[{}]/d{} = {} vs FD {} at ({}, {}, {})",
                        j,
                        ["x", "y", "z"][k],
                        nd[(k, j)],
                        row[j],
                        x,
                        y,
                        z
                    );
                }
            }
        }
    }

    #[test]
    fn expanded_form_repeats_weights_per_component() {
        let sf = shapes();
        let n = sf.values(0.2, -0.4, 0.6);
        let s = sf.expanded(0.2, -0.4, 0.6);
        for a in 0..NUM_SHAPE {
            assert_eq!(s[(0, 3 * a)], n[a]);
            assert_eq!(s[(1, 3 * a + 1)], n[a]);
            assert_eq!(s[(2, 3 * a + 2)], n[a]);
            assert_eq!(s[(0, 3 * a + 1)], 0.0);
        }
    }
}

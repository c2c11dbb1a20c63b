//! Brick9: 9-node hexahedral continuum element with a central curvature node
//!
//! Eight corner nodes carry positions (3 DOFs each). A central node carries
//! the second derivatives of the position field along the three element axes
//! (9 DOFs), enriching the trilinear brick with quadratic modes.
//!
//! # Element Description
//!
//! - **Type**: 3D solid, isoparametric, total Lagrangian
//! - **Nodes**: 8 corner + 1 curvature
//! - **DOFs**: 8 × 3 + 9 = 33
//! - **Strain**: Green-Lagrange
//! - **Material**: linear elastic (6x6 constitutive matrix)
//! - **Integration**: 3×3×3 Gauss (mass always; force/tangent by default)
//!
//! The generalized coordinates are the rows of the 11x3 coordinate matrix:
//! rows 0..=7 are corner positions, rows 8..=10 are ∂²r/∂X², ∂²r/∂Y², ∂²r/∂Z².
//! Element vectors are flattened row by row, i.e. index `3·row + component`.

use crate::config::ElementConfig;
use crate::elements::shape::{NUM_SHAPE, ShapeDerivatives, ShapeFunctions};
use crate::elements::{DofBlock, Element, VolumeLoadable, check_matrix_shape, check_vector_len};
use crate::error::{ElementError, Result};
use crate::materials::Material;
use crate::nodes::{CurvNodeId, NodeRef, NodeStore, XyzNodeId};
use crate::postprocess::{PointResult, StrainState, StressState};
use crate::quadrature::{GaussPoint, IntegrationRule};
use log::{debug, trace};
use nalgebra::{DMatrix, DVector, Matrix3, Matrix6, SMatrix, SVector, Vector3, Vector6};
use std::sync::Arc;

/// Number of element DOFs
pub const NUM_DOFS: usize = 8 * 3 + 9;

/// 11x3 matrix of nodal coordinates (8 corners + 3 curvature vectors)
pub type CoordMatrix = SMatrix<f64, NUM_SHAPE, 3>;

/// 33x1 element vector
pub type ElementVector = SVector<f64, NUM_DOFS>;

/// 33x33 element matrix
pub type ElementMatrix = SMatrix<f64, NUM_DOFS, NUM_DOFS>;

type StrainMatrix = SMatrix<f64, 6, NUM_DOFS>;

/// Lifecycle state of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    /// Nodes or material not bound yet
    Unconfigured,
    /// Nodes and material bound, `setup` not run
    Configured,
    /// Reference configuration and mass matrix fixed
    Initialized,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Brick9Nodes {
    corners: [XyzNodeId; 8],
    central: CurvNodeId,
}

/// Quantities fixed by `setup`
#[derive(Debug, Clone)]
struct ReferenceState {
    d0: CoordMatrix,
    mass: ElementMatrix,
    gravity_force: ElementVector,
    e_eps: Matrix6<f64>,
    volume: f64,
}

/// Brick element with 9 nodes (central node for curvature)
#[derive(Debug, Clone)]
pub struct Brick9 {
    /// Element ID
    pub id: i32,
    nodes: Option<Brick9Nodes>,
    material: Option<Arc<Material>>,
    dims: Vector3<f64>,
    gravity_on: bool,
    alpha: f64,
    rule: IntegrationRule,
    reference: Option<ReferenceState>,
    d: CoordMatrix,
    d_dt: ElementVector,
}

impl Brick9 {
    /// Create an empty, unconfigured element
    pub fn new(id: i32) -> Self {
        Self {
            id,
            nodes: None,
            material: None,
            dims: Vector3::zeros(),
            gravity_on: false,
            alpha: 0.0,
            rule: IntegrationRule::Full,
            reference: None,
            d: CoordMatrix::zeros(),
            d_dt: ElementVector::zeros(),
        }
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.reference.is_some() {
            return Err(ElementError::AlreadyInitialized);
        }
        Ok(())
    }

    fn reference(&self) -> Result<&ReferenceState> {
        self.reference.as_ref().ok_or(ElementError::NotInitialized)
    }

    /// Bind the eight corner nodes and the central curvature node
    pub fn set_nodes(&mut self, corners: [XyzNodeId; 8], central: CurvNodeId) -> Result<()> {
        self.ensure_mutable()?;
        self.nodes = Some(Brick9Nodes { corners, central });
        Ok(())
    }

    /// Set element dimensions along x, y, z
    pub fn set_dimensions(&mut self, dims: Vector3<f64>) -> Result<()> {
        self.ensure_mutable()?;
        self.dims = dims;
        Ok(())
    }

    pub fn set_material(&mut self, material: Arc<Material>) -> Result<()> {
        self.ensure_mutable()?;
        self.material = Some(material);
        Ok(())
    }

    /// Enable/disable internal gravity calculation
    pub fn set_gravity_on(&mut self, on: bool) -> Result<()> {
        self.ensure_mutable()?;
        self.gravity_on = on;
        Ok(())
    }

    /// Set the structural damping coefficient
    pub fn set_alpha_damp(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    /// Integration rule for internal forces and tangent
    pub fn set_integration_rule(&mut self, rule: IntegrationRule) {
        self.rule = rule;
    }

    /// Apply dimensions, gravity flag, damping and integration rule at once
    pub fn configure(&mut self, config: &ElementConfig) -> Result<()> {
        self.set_dimensions(Vector3::from(config.dimensions))?;
        self.set_gravity_on(config.gravity_on)?;
        self.set_alpha_damp(config.alpha_damp);
        self.set_integration_rule(config.integration);
        Ok(())
    }

    pub fn state(&self) -> ElementState {
        if self.reference.is_some() {
            ElementState::Initialized
        } else if self.nodes.is_some() && self.material.is_some() {
            ElementState::Configured
        } else {
            ElementState::Unconfigured
        }
    }

    pub fn corner_nodes(&self) -> Option<&[XyzNodeId; 8]> {
        self.nodes.as_ref().map(|n| &n.corners)
    }

    pub fn central_node(&self) -> Option<CurvNodeId> {
        self.nodes.as_ref().map(|n| n.central)
    }

    pub fn dimensions(&self) -> &Vector3<f64> {
        &self.dims
    }

    pub fn material(&self) -> Option<&Arc<Material>> {
        self.material.as_ref()
    }

    pub fn is_gravity_on(&self) -> bool {
        self.gravity_on
    }

    pub fn alpha_damp(&self) -> f64 {
        self.alpha
    }

    pub fn integration_rule(&self) -> IntegrationRule {
        self.rule
    }

    pub fn shape_functions(&self) -> ShapeFunctions {
        ShapeFunctions::new(self.dims)
    }

    /// Reference (undeformed) coordinate matrix
    pub fn reference_coordinates(&self) -> Result<&CoordMatrix> {
        Ok(&self.reference()?.d0)
    }

    /// Current coordinate matrix, as of the last `update`
    pub fn current_coordinates(&self) -> &CoordMatrix {
        &self.d
    }

    /// Current nodal velocities, as of the last `update`
    pub fn current_velocities(&self) -> &ElementVector {
        &self.d_dt
    }

    /// Constant mass matrix computed at setup
    pub fn mass_matrix(&self) -> Result<&ElementMatrix> {
        Ok(&self.reference()?.mass)
    }

    /// Gravitational nodal load computed at setup (zero if gravity is off)
    pub fn gravity_force(&self) -> Result<&ElementVector> {
        Ok(&self.reference()?.gravity_force)
    }

    /// 6x6 constitutive matrix used for the stress computation
    pub fn constitutive_matrix(&self) -> Result<&Matrix6<f64>> {
        Ok(&self.reference()?.e_eps)
    }

    /// Reference volume
    pub fn volume(&self) -> Result<f64> {
        Ok(self.reference()?.volume)
    }

    /// Current 11x3 coordinate matrix read from the nodes
    pub fn calc_coord_matrix(&self, nodes: &NodeStore) -> Result<CoordMatrix> {
        let bound = self.nodes.as_ref().ok_or(ElementError::NodesNotSet)?;
        let mut d = CoordMatrix::zeros();
        for (row, &id) in bound.corners.iter().enumerate() {
            d.set_row(row, &nodes.xyz(id)?.pos.transpose());
        }
        for (k, r) in nodes.curv(bound.central)?.curvatures().iter().enumerate() {
            d.set_row(8 + k, &r.transpose());
        }
        Ok(d)
    }

    /// Current 33x1 vector of nodal velocities read from the nodes
    pub fn calc_coord_deriv_matrix(&self, nodes: &NodeStore) -> Result<ElementVector> {
        let bound = self.nodes.as_ref().ok_or(ElementError::NodesNotSet)?;
        let mut v = ElementVector::zeros();
        for (row, &id) in bound.corners.iter().enumerate() {
            v.fixed_rows_mut::<3>(3 * row).copy_from(&nodes.xyz(id)?.pos_dt);
        }
        for (k, r) in nodes.curv(bound.central)?.curvature_rates().iter().enumerate() {
            v.fixed_rows_mut::<3>(3 * (8 + k)).copy_from(r);
        }
        Ok(v)
    }

    /// Jacobian determinant of the reference configuration at (x, y, z)
    pub fn calc_det_j0(&self, x: f64, y: f64, z: f64) -> Result<f64> {
        reference_det_j(&self.shape_functions(), &self.reference()?.d0, [x, y, z])
    }

    /// Jacobian determinant plus physical derivative rows at (x, y, z)
    pub fn calc_det_j0_full(&self, x: f64, y: f64, z: f64) -> Result<(f64, ShapeDerivatives)> {
        reference_jacobian(&self.shape_functions(), &self.reference()?.d0, [x, y, z])
    }

    /// Elastic internal forces, including structural damping when α ≠ 0
    ///
    /// Sign convention: the returned vector is the resisting force, i.e. the
    /// gradient of the strain energy; the host subtracts it from external loads.
    pub fn internal_forces(&self) -> Result<ElementVector> {
        let reference = self.reference()?;
        let ctx = self.quadrature_context(reference);
        compute_internal_forces(&ctx, self.rule)
    }

    /// Stiffness K = ∂f/∂q and damping R = ∂f/∂q̇
    pub fn stiffness_and_damping(&self) -> Result<(ElementMatrix, ElementMatrix)> {
        let reference = self.reference()?;
        let ctx = self.quadrature_context(reference);
        compute_internal_jacobians(&ctx, self.rule)
    }

    /// kfactor·K + rfactor·R + mfactor·M
    pub fn tangent_matrix(&self, kfactor: f64, rfactor: f64, mfactor: f64) -> Result<ElementMatrix> {
        let (k, r) = self.stiffness_and_damping()?;
        let mass = &self.reference()?.mass;
        Ok(k * kfactor + r * rfactor + mass * mfactor)
    }

    /// Green-Lagrange strain and stress at a parametric point
    pub fn strain_at(&self, x: f64, y: f64, z: f64) -> Result<PointResult> {
        let reference = self.reference()?;
        let ctx = self.quadrature_context(reference);
        let kin = point_kinematics(&ctx, [x, y, z])?;
        let stress = ctx.e_eps * (kin.strain + kin.strain_rate * ctx.alpha);
        Ok(PointResult {
            point: [x, y, z],
            strain: StrainState::from_voigt(&kin.strain),
            stress: StressState::from_voigt(&stress),
        })
    }

    /// Strain and stress at every point of the element's integration rule
    pub fn integration_point_results(&self) -> Result<Vec<PointResult>> {
        self.rule
            .points()
            .iter()
            .map(|gp| self.strain_at(gp.xi, gp.eta, gp.zeta))
            .collect()
    }

    /// Nᵀ·F at (u, v, w) and det[J] of the reference configuration there
    pub fn generalized_load(&self, u: f64, v: f64, w: f64, f: &Vector3<f64>) -> Result<(ElementVector, f64)> {
        let sf = self.shape_functions();
        let det_j = reference_det_j(&sf, &self.reference()?.d0, [u, v, w])?;
        let n = sf.values(u, v, w);
        let mut q = ElementVector::zeros();
        for a in 0..NUM_SHAPE {
            q.fixed_rows_mut::<3>(3 * a).copy_from(&(f * n[a]));
        }
        Ok((q, det_j))
    }

    fn quadrature_context<'a>(&'a self, reference: &'a ReferenceState) -> QuadratureContext<'a> {
        QuadratureContext {
            sf: self.shape_functions(),
            d0: &reference.d0,
            d: &self.d,
            d_dt: CoordMatrix::from_fn(|a, i| self.d_dt[3 * a + i]),
            e_eps: &reference.e_eps,
            alpha: self.alpha,
        }
    }
}

impl Element for Brick9 {
    fn num_nodes(&self) -> usize {
        9
    }

    fn num_dofs(&self) -> usize {
        NUM_DOFS
    }

    fn node_dofs(&self, n: usize) -> usize {
        if n < 8 { 3 } else { 9 }
    }

    fn dof_blocks(&self) -> Result<Vec<DofBlock>> {
        let bound = self.nodes.as_ref().ok_or(ElementError::NodesNotSet)?;
        let mut blocks: Vec<DofBlock> = bound
            .corners
            .iter()
            .enumerate()
            .map(|(i, &id)| DofBlock {
                node: NodeRef::Xyz(id),
                local_offset: 3 * i,
                width: 3,
            })
            .collect();
        blocks.push(DofBlock {
            node: NodeRef::Curv(bound.central),
            local_offset: 24,
            width: 9,
        });
        Ok(blocks)
    }

    fn setup(&mut self, nodes: &NodeStore, gravity: &Vector3<f64>) -> Result<()> {
        self.ensure_mutable()?;
        if self.nodes.is_none() {
            return Err(ElementError::NodesNotSet);
        }
        let material = self.material.clone().ok_or(ElementError::MaterialNotSet)?;
        if !self.dims.iter().all(|&v| v.is_finite() && v > 0.0) {
            return Err(ElementError::InvalidDimensions([self.dims.x, self.dims.y, self.dims.z]));
        }

        let e_eps = material.constitutive_matrix()?;
        let rho = material.density()?;
        let d0 = self.calc_coord_matrix(nodes)?;
        let d_dt = self.calc_coord_deriv_matrix(nodes)?;

        let sf = self.shape_functions();
        let (mass, volume) = compute_mass_matrix(&sf, &d0, rho)?;
        let gravity_force = if self.gravity_on {
            compute_gravity_force(&sf, &d0, rho, gravity)?
        } else {
            ElementVector::zeros()
        };

        debug!(
            "brick9 {}: setup volume = {:.6e}, mass = {:.6e}, gravity = {}",
            self.id,
            volume,
            rho * volume,
            self.gravity_on
        );

        self.d = d0;
        self.d_dt = d_dt;
        self.reference = Some(ReferenceState {
            d0,
            mass,
            gravity_force,
            e_eps,
            volume,
        });
        Ok(())
    }

    fn update(&mut self, nodes: &NodeStore) -> Result<()> {
        self.reference()?;
        self.d = self.calc_coord_matrix(nodes)?;
        self.d_dt = self.calc_coord_deriv_matrix(nodes)?;
        trace!("brick9 {}: state refreshed", self.id);
        Ok(())
    }

    fn compute_mass_matrix_into(&self, out: &mut DMatrix<f64>) -> Result<()> {
        check_matrix_shape(out, NUM_DOFS, NUM_DOFS, "mass matrix")?;
        out.copy_from(self.mass_matrix()?);
        Ok(())
    }

    fn compute_internal_forces_into(&self, out: &mut DVector<f64>) -> Result<()> {
        check_vector_len(out, NUM_DOFS, "internal force vector")?;
        out.copy_from(&self.internal_forces()?);
        Ok(())
    }

    fn compute_tangent_matrix_into(
        &self,
        out: &mut DMatrix<f64>,
        kfactor: f64,
        rfactor: f64,
        mfactor: f64,
    ) -> Result<()> {
        check_matrix_shape(out, NUM_DOFS, NUM_DOFS, "tangent matrix")?;
        out.copy_from(&self.tangent_matrix(kfactor, rfactor, mfactor)?);
        Ok(())
    }
}

impl VolumeLoadable for Brick9 {
    fn field_ncoords(&self) -> usize {
        3
    }

    fn ndof_x(&self) -> usize {
        NUM_DOFS
    }

    fn ndof_w(&self) -> usize {
        NUM_DOFS
    }

    fn state_block_x(&self, nodes: &NodeStore) -> Result<DVector<f64>> {
        let d = self.calc_coord_matrix(nodes)?;
        Ok(DVector::from_fn(NUM_DOFS, |k, _| d[(k / 3, k % 3)]))
    }

    fn state_block_w(&self, nodes: &NodeStore) -> Result<DVector<f64>> {
        let v = self.calc_coord_deriv_matrix(nodes)?;
        Ok(DVector::from_column_slice(v.as_slice()))
    }

    fn compute_nf(&self, u: f64, v: f64, w: f64, f: &DVector<f64>) -> Result<(DVector<f64>, f64)> {
        check_vector_len(f, 3, "applied field load")?;
        let load = Vector3::new(f[0], f[1], f[2]);
        let (q, det_j) = self.generalized_load(u, v, w, &load)?;
        Ok((DVector::from_column_slice(q.as_slice()), det_j))
    }

    fn density(&self) -> Result<f64> {
        self.material.as_ref().ok_or(ElementError::MaterialNotSet)?.density()
    }
}

// -----------------------------------------------------------------------------
// Quadrature kernels. State is passed in explicitly so the kernels stay free
// functions of the coordinate matrices and material data.
// -----------------------------------------------------------------------------

#[derive(Clone, Copy)]
struct QuadratureContext<'a> {
    sf: ShapeFunctions,
    d0: &'a CoordMatrix,
    d: &'a CoordMatrix,
    d_dt: CoordMatrix,
    e_eps: &'a Matrix6<f64>,
    alpha: f64,
}

/// Kinematic quantities at one quadrature point
struct PointKinematics {
    det_j: f64,
    /// Physical derivative rows ∂N/∂X (3x11)
    g: ShapeDerivatives,
    /// Row i holds ∂x/∂X_i
    f: Matrix3<f64>,
    /// Row i holds ∂ẋ/∂X_i
    v: Matrix3<f64>,
    strain: Vector6<f64>,
    strain_rate: Vector6<f64>,
}

fn jacobian_matrix(sf: &ShapeFunctions, d0: &CoordMatrix, point: [f64; 3]) -> (Matrix3<f64>, ShapeDerivatives) {
    let nd = sf.derivatives(point[0], point[1], point[2]);
    (nd * d0, nd)
}

/// det[J] of the parametric-to-reference map
fn reference_det_j(sf: &ShapeFunctions, d0: &CoordMatrix, point: [f64; 3]) -> Result<f64> {
    let (j, _) = jacobian_matrix(sf, d0, point);
    let det = j.determinant();
    if !(det > 0.0) {
        return Err(ElementError::DegenerateGeometry { det, point });
    }
    Ok(det)
}

/// det[J] and the physical derivative rows G = J⁻¹·Nd
fn reference_jacobian(sf: &ShapeFunctions, d0: &CoordMatrix, point: [f64; 3]) -> Result<(f64, ShapeDerivatives)> {
    let (j, nd) = jacobian_matrix(sf, d0, point);
    let det = j.determinant();
    if !(det > 0.0) {
        return Err(ElementError::DegenerateGeometry { det, point });
    }
    let j_inv = j
        .try_inverse()
        .ok_or(ElementError::DegenerateGeometry { det, point })?;
    Ok((det, j_inv * nd))
}

/// Symmetric tensor to Voigt form with engineering shear
fn to_voigt(e: &Matrix3<f64>) -> Vector6<f64> {
    Vector6::new(
        e[(0, 0)],
        e[(1, 1)],
        e[(2, 2)],
        2.0 * e[(0, 1)],
        2.0 * e[(1, 2)],
        2.0 * e[(0, 2)],
    )
}

/// Voigt stress to symmetric tensor
fn stress_tensor(s: &Vector6<f64>) -> Matrix3<f64> {
    Matrix3::new(
        s[0], s[3], s[5], //
        s[3], s[1], s[4], //
        s[5], s[4], s[2],
    )
}

fn point_kinematics(ctx: &QuadratureContext<'_>, point: [f64; 3]) -> Result<PointKinematics> {
    let (det_j, g) = reference_jacobian(&ctx.sf, ctx.d0, point)?;
    let f = g * ctx.d;
    let f0 = g * ctx.d0;
    let v = g * ctx.d_dt;

    // E = ½(F Fᵀ − F0 F0ᵀ); identically zero when d == d0
    let strain = to_voigt(&((f * f.transpose() - f0 * f0.transpose()) * 0.5));
    let strain_rate = to_voigt(&((v * f.transpose() + f * v.transpose()) * 0.5));

    Ok(PointKinematics {
        det_j,
        g,
        f,
        v,
        strain,
        strain_rate,
    })
}

/// Strain-displacement matrix ∂ε/∂q built from the rows of `f`
///
/// With `f` replaced by the velocity gradient rows this gives ∂ε̇/∂q.
fn strain_matrix(g: &ShapeDerivatives, f: &Matrix3<f64>) -> StrainMatrix {
    let mut b = StrainMatrix::zeros();
    for a in 0..NUM_SHAPE {
        let (gx, gy, gz) = (g[(0, a)], g[(1, a)], g[(2, a)]);
        for m in 0..3 {
            let col = 3 * a + m;
            b[(0, col)] = gx * f[(0, m)];
            b[(1, col)] = gy * f[(1, m)];
            b[(2, col)] = gz * f[(2, m)];
            b[(3, col)] = gx * f[(1, m)] + gy * f[(0, m)];
            b[(4, col)] = gy * f[(2, m)] + gz * f[(1, m)];
            b[(5, col)] = gz * f[(0, m)] + gx * f[(2, m)];
        }
    }
    b
}

fn compute_mass_matrix(sf: &ShapeFunctions, d0: &CoordMatrix, rho: f64) -> Result<(ElementMatrix, f64)> {
    let mut mass = ElementMatrix::zeros();
    let mut volume = 0.0;

    for gp in IntegrationRule::Full.points() {
        let det_j = reference_det_j(sf, d0, gp.coords())?;
        let n = sf.values(gp.xi, gp.eta, gp.zeta);
        let dv = gp.weight * det_j;
        volume += dv;

        for a in 0..NUM_SHAPE {
            for b in 0..NUM_SHAPE {
                let m_ab = rho * n[a] * n[b] * dv;
                for i in 0..3 {
                    mass[(3 * a + i, 3 * b + i)] += m_ab;
                }
            }
        }
    }

    Ok((mass, volume))
}

fn compute_gravity_force(
    sf: &ShapeFunctions,
    d0: &CoordMatrix,
    rho: f64,
    gravity: &Vector3<f64>,
) -> Result<ElementVector> {
    let mut force = ElementVector::zeros();
    for gp in IntegrationRule::Full.points() {
        let det_j = reference_det_j(sf, d0, gp.coords())?;
        let n = sf.values(gp.xi, gp.eta, gp.zeta);
        let scale = rho * gp.weight * det_j;
        for a in 0..NUM_SHAPE {
            let mut block = force.fixed_rows_mut::<3>(3 * a);
            block += gravity * (n[a] * scale);
        }
    }
    Ok(force)
}

fn compute_internal_forces(ctx: &QuadratureContext<'_>, rule: IntegrationRule) -> Result<ElementVector> {
    let mut fi = ElementVector::zeros();
    for gp in rule.points() {
        let kin = point_kinematics(ctx, gp.coords())?;
        let stress = ctx.e_eps * (kin.strain + kin.strain_rate * ctx.alpha);
        let b = strain_matrix(&kin.g, &kin.f);
        fi += b.transpose() * stress * (gp.weight * kin.det_j);
    }
    Ok(fi)
}

fn compute_internal_jacobians(
    ctx: &QuadratureContext<'_>,
    rule: IntegrationRule,
) -> Result<(ElementMatrix, ElementMatrix)> {
    let mut k = ElementMatrix::zeros();
    let mut r = ElementMatrix::zeros();

    for gp in rule.points() {
        accumulate_point_jacobians(ctx, &gp, &mut k, &mut r)?;
    }
    Ok((k, r))
}

fn accumulate_point_jacobians(
    ctx: &QuadratureContext<'_>,
    gp: &GaussPoint,
    k: &mut ElementMatrix,
    r: &mut ElementMatrix,
) -> Result<()> {
    let kin = point_kinematics(ctx, gp.coords())?;
    let scale = gp.weight * kin.det_j;
    let stress = ctx.e_eps * (kin.strain + kin.strain_rate * ctx.alpha);
    let b = strain_matrix(&kin.g, &kin.f);
    let bt_d = b.transpose() * ctx.e_eps;
    let k_mat = &bt_d * b;

    *k += k_mat * scale;

    if ctx.alpha != 0.0 {
        // the strain rate depends on q through F
        let b_v = strain_matrix(&kin.g, &kin.v);
        *k += &bt_d * b_v * (ctx.alpha * scale);
        *r += k_mat * (ctx.alpha * scale);
    }

    // geometric stiffness (Gᵀ S G) ⊗ I3
    let k_geo = kin.g.transpose() * stress_tensor(&stress) * kin.g;
    for a in 0..NUM_SHAPE {
        for c in 0..NUM_SHAPE {
            let value = k_geo[(a, c)] * scale;
            for m in 0..3 {
                k[(3 * a + m, 3 * c + m)] += value;
            }
        }
    }
    Ok(())
}

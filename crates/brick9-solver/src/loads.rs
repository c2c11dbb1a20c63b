//! Volume loads and conversion to equivalent nodal forces.
//!
//! Works on any [`VolumeLoadable`] element: the element supplies Nᵀ·F and
//! det[J] at a parametric point, the integrator supplies the quadrature.
//!
//! # Workflow
//! 1. Caller describes a load density F(u, v, w) per unit volume
//! 2. `integrate_volume_load` samples it at the Gauss points
//! 3. Each sample is weighted by det[J] and the Gauss weight

use crate::elements::VolumeLoadable;
use crate::error::Result;
use crate::quadrature::IntegrationRule;
use nalgebra::{DVector, Vector3};

/// Integrate a volume load density over an element
///
/// # Arguments
/// * `element` - Element receiving the load
/// * `rule` - Quadrature rule
/// * `density` - Load per unit volume at parametric point (u, v, w)
///
/// # Returns
/// Generalized nodal load vector (size `ndof_w`)
pub fn integrate_volume_load<E, F>(element: &E, rule: IntegrationRule, mut density: F) -> Result<DVector<f64>>
where
    E: VolumeLoadable + ?Sized,
    F: FnMut(f64, f64, f64) -> Vector3<f64>,
{
    let mut q = DVector::zeros(element.ndof_w());
    for gp in rule.points() {
        let f = density(gp.xi, gp.eta, gp.zeta);
        let load = DVector::from_column_slice(f.as_slice());
        let (qi, det_j) = element.compute_nf(gp.xi, gp.eta, gp.zeta, &load)?;
        q += qi * (gp.weight * det_j);
    }
    Ok(q)
}

/// Gravity load ρ·g integrated over the element volume
pub fn gravity_load<E>(element: &E, gravity: &Vector3<f64>) -> Result<DVector<f64>>
where
    E: VolumeLoadable + ?Sized,
{
    let rho = element.density()?;
    integrate_volume_load(element, IntegrationRule::Full, |_, _, _| gravity * rho)
}

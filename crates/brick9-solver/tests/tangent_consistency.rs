//! Analytic Jacobians of the internal force against central differences

mod common;

use brick9_solver::elements::brick9::NUM_DOFS;
use brick9_solver::{Brick9, Element, ElementMatrix, ElementVector, IntegrationRule, NodeStore};
use common::*;

const STEP: f64 = 1e-6;

fn force_at(elem: &Brick9, nodes: &NodeStore) -> ElementVector {
    let mut probe = elem.clone();
    probe.update(nodes).unwrap();
    probe.internal_forces().unwrap()
}

/// ∂f/∂q (or ∂f/∂q̇ when `rate` is set) by central differences
fn finite_difference(elem: &Brick9, nodes: &mut NodeStore, rate: bool) -> ElementMatrix {
    let mut jac = ElementMatrix::zeros();
    for k in 0..NUM_DOFS {
        let base = *dof_mut(nodes, elem, k, rate);

        *dof_mut(nodes, elem, k, rate) = base + STEP;
        let plus = force_at(elem, nodes);
        *dof_mut(nodes, elem, k, rate) = base - STEP;
        let minus = force_at(elem, nodes);
        *dof_mut(nodes, elem, k, rate) = base;

        jac.set_column(k, &((plus - minus) / (2.0 * STEP)));
    }
    jac
}

fn assert_close(analytic: &ElementMatrix, numeric: &ElementMatrix, what: &str) {
    let scale = max_abs(analytic.iter());
    assert!(scale > 0.0, "{what} is identically zero");
    let err = max_abs((analytic - numeric).iter());
    assert!(err < 1e-6 * scale, "{what}: max error {err:e} against scale {scale:e}");
}

#[test]
fn stiffness_matches_finite_differences() {
    let (mut nodes, mut elem) = unit_cube(soft(), false);
    deform(&mut nodes, &elem, 0.05);
    elem.update(&nodes).unwrap();

    let (k, r) = elem.stiffness_and_damping().unwrap();
    assert!(r.iter().all(|&v| v == 0.0));
    assert_close(&k, &finite_difference(&elem, &mut nodes, false), "K");
}

#[test]
fn stiffness_matches_finite_differences_with_reduced_rule() {
    let (mut nodes, mut elem) = unit_cube(soft(), false);
    elem.set_integration_rule(IntegrationRule::Reduced);
    deform(&mut nodes, &elem, 0.08);
    elem.update(&nodes).unwrap();

    let (k, _) = elem.stiffness_and_damping().unwrap();
    assert_close(&k, &finite_difference(&elem, &mut nodes, false), "K (reduced)");
}

#[test]
fn damped_jacobians_match_finite_differences() {
    let (mut nodes, mut elem) = unit_cube(soft(), false);
    elem.set_alpha_damp(0.05);
    deform(&mut nodes, &elem, 0.04);
    agitate(&mut nodes, &elem, 0.5);
    elem.update(&nodes).unwrap();

    let (k, r) = elem.stiffness_and_damping().unwrap();
    assert_close(&k, &finite_difference(&elem, &mut nodes, false), "K (damped)");
    assert_close(&r, &finite_difference(&elem, &mut nodes, true), "R");
}

#[test]
fn stiffness_is_symmetric_without_damping() {
    let (mut nodes, mut elem) = unit_cube(soft(), false);
    deform(&mut nodes, &elem, 0.1);
    elem.update(&nodes).unwrap();

    let (k, _) = elem.stiffness_and_damping().unwrap();
    let scale = max_abs(k.iter());
    assert!(max_abs((k - k.transpose()).iter()) < 1e-12 * scale);
}

#[test]
fn tangent_combines_the_three_matrices() {
    let (mut nodes, mut elem) = unit_cube(soft(), false);
    elem.set_alpha_damp(0.01);
    deform(&mut nodes, &elem, 0.03);
    agitate(&mut nodes, &elem, 0.2);
    elem.update(&nodes).unwrap();

    let (kf, rf, mf) = (0.7, -1.3, 2.5);
    let (k, r) = elem.stiffness_and_damping().unwrap();
    let m = elem.mass_matrix().unwrap();
    let expected = k * kf + r * rf + m * mf;
    let tangent = elem.tangent_matrix(kf, rf, mf).unwrap();
    assert!(max_abs((tangent - expected).iter()) <= 1e-12 * max_abs(expected.iter()));

    let mass_only = elem.tangent_matrix(0.0, 0.0, 1.0).unwrap();
    assert_eq!(&mass_only, m);
}

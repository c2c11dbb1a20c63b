//! Shared fixtures for the brick element tests.
#![allow(dead_code)]

use brick9_solver::elements::shape::CORNERS;
use brick9_solver::{Brick9, Element, Material, NodeStore};
use nalgebra::Vector3;
use std::sync::Arc;

pub const GRAVITY: [f64; 3] = [0.0, 0.0, -9.81];

pub fn steel() -> Material {
    Material::isotropic("STEEL", 200e9, 0.3, 7800.0)
}

/// Soft material keeping force magnitudes near unity for FD checks
pub fn soft() -> Material {
    Material::isotropic("SOFT", 1.0e3, 0.25, 1000.0)
}

/// Corner positions of an `a × b × c` box with its minimum corner at `origin`
pub fn box_corners(origin: Vector3<f64>, dims: Vector3<f64>) -> [Vector3<f64>; 8] {
    CORNERS.map(|c| {
        origin
            + Vector3::new(
                (c[0] + 1.0) / 2.0 * dims.x,
                (c[1] + 1.0) / 2.0 * dims.y,
                (c[2] + 1.0) / 2.0 * dims.z,
            )
    })
}

/// Element built on the given corners with zero reference curvature
pub fn element_on(
    corners: [Vector3<f64>; 8],
    dims: Vector3<f64>,
    material: Material,
    gravity_on: bool,
) -> (NodeStore, Brick9) {
    let mut nodes = NodeStore::new();
    let ids = corners.map(|p| nodes.add_xyz(p));
    let central = nodes.add_curv_zero();

    let mut elem = Brick9::new(1);
    elem.set_nodes(ids, central).unwrap();
    elem.set_dimensions(dims).unwrap();
    elem.set_material(Arc::new(material)).unwrap();
    elem.set_gravity_on(gravity_on).unwrap();
    elem.setup(&nodes, &Vector3::from(GRAVITY)).unwrap();
    (nodes, elem)
}

/// Unit cube [0, 1]³
pub fn unit_cube(material: Material, gravity_on: bool) -> (NodeStore, Brick9) {
    let dims = Vector3::new(1.0, 1.0, 1.0);
    element_on(box_corners(Vector3::zeros(), dims), dims, material, gravity_on)
}

/// Mutable access to generalized coordinate `k` (or its rate) through the nodes
pub fn dof_mut<'a>(nodes: &'a mut NodeStore, elem: &Brick9, k: usize, rate: bool) -> &'a mut f64 {
    let (row, comp) = (k / 3, k % 3);
    if row < 8 {
        let id = elem.corner_nodes().expect("nodes bound")[row];
        let node = nodes.xyz_mut(id).unwrap();
        if rate {
            &mut node.pos_dt[comp]
        } else {
            &mut node.pos[comp]
        }
    } else {
        let node = nodes.curv_mut(elem.central_node().expect("nodes bound")).unwrap();
        let vector = match (row, rate) {
            (8, false) => &mut node.rxx,
            (9, false) => &mut node.ryy,
            (10, false) => &mut node.rzz,
            (8, true) => &mut node.rxx_dt,
            (9, true) => &mut node.ryy_dt,
            _ => &mut node.rzz_dt,
        };
        &mut vector[comp]
    }
}

/// Deterministic, non-trivial deformation of every generalized coordinate
pub fn deform(nodes: &mut NodeStore, elem: &Brick9, amplitude: f64) {
    for k in 0..33 {
        *dof_mut(nodes, elem, k, false) += amplitude * (1.7 * k as f64 + 0.3).sin();
    }
}

/// Deterministic velocity field
pub fn agitate(nodes: &mut NodeStore, elem: &Brick9, amplitude: f64) {
    for k in 0..33 {
        *dof_mut(nodes, elem, k, true) = amplitude * (0.9 * k as f64 - 1.1).cos();
    }
}

pub fn max_abs<'a, I: IntoIterator<Item = &'a f64>>(values: I) -> f64 {
    values.into_iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

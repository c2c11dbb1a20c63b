//! Per-element parallel evaluation
//!
//! Elements are independent once the node state is final for the step, so
//! each one is evaluated as its own rayon task against the shared, read-only
//! [`NodeStore`]. Results are returned per element in input order; scattering
//! them into global vectors and matrices is left to the host.

use crate::elements::{Brick9, Element, ElementMatrix, ElementVector};
use crate::error::Result;
use crate::nodes::NodeStore;
use nalgebra::Vector3;
use rayon::prelude::*;

/// Set up every element against the same node state
pub fn setup_all(elements: &mut [Brick9], nodes: &NodeStore, gravity: &Vector3<f64>) -> Result<()> {
    elements
        .par_iter_mut()
        .try_for_each(|elem| elem.setup(nodes, gravity))
}

/// Refresh the current state of every element
pub fn update_all(elements: &mut [Brick9], nodes: &NodeStore) -> Result<()> {
    elements.par_iter_mut().try_for_each(|elem| elem.update(nodes))
}

/// Internal force vector of each element
pub fn internal_forces(elements: &[Brick9]) -> Result<Vec<ElementVector>> {
    elements.par_iter().map(Brick9::internal_forces).collect()
}

/// Tangent matrix `kfactor·K + rfactor·R + mfactor·M` of each element
pub fn tangent_matrices(
    elements: &[Brick9],
    kfactor: f64,
    rfactor: f64,
    mfactor: f64,
) -> Result<Vec<ElementMatrix>> {
    elements
        .par_iter()
        .map(|elem| elem.tangent_matrix(kfactor, rfactor, mfactor))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ElementError;
    use crate::materials::Material;
    use std::sync::Arc;

    fn bar(nodes: &mut NodeStore, count: usize) -> Vec<Brick9> {
        // a row of unit cubes along x sharing faces
        let mut layers = Vec::new();
        for i in 0..=count {
            let x = i as f64;
            layers.push([
                nodes.add_xyz(Vector3::new(x, 0.0, 0.0)),
                nodes.add_xyz(Vector3::new(x, 1.0, 0.0)),
                nodes.add_xyz(Vector3::new(x, 0.0, 1.0)),
                nodes.add_xyz(Vector3::new(x, 1.0, 1.0)),
            ]);
        }
        let material = Arc::new(Material::isotropic("aluminium", 70e9, 0.33, 2700.0));
        (0..count)
            .map(|i| {
                let (l, r) = (layers[i], layers[i + 1]);
                let mut elem = Brick9::new(i as i32 + 1);
                elem.set_nodes([l[0], r[0], r[1], l[1], l[2], r[2], r[3], l[3]], nodes.add_curv_zero())
                    .unwrap();
                elem.set_dimensions(Vector3::new(1.0, 1.0, 1.0)).unwrap();
                elem.set_material(material.clone()).unwrap();
                elem
            })
            .collect()
    }

    #[test]
    fn parallel_results_match_sequential() {
        let mut nodes = NodeStore::new();
        let mut elements = bar(&mut nodes, 4);
        setup_all(&mut elements, &nodes, &Vector3::zeros()).unwrap();

        for id in 0..nodes.num_xyz() {
            let node = nodes.xyz_mut(crate::nodes::XyzNodeId(id)).unwrap();
            node.pos.x *= 1.01;
        }
        update_all(&mut elements, &nodes).unwrap();

        let forces = internal_forces(&elements).unwrap();
        let tangents = tangent_matrices(&elements, 1.0, 0.0, 0.0).unwrap();
        assert_eq!(forces.len(), 4);
        for (elem, (f, k)) in elements.iter().zip(forces.iter().zip(&tangents)) {
            assert_eq!(*f, elem.internal_forces().unwrap());
            assert_eq!(*k, elem.tangent_matrix(1.0, 0.0, 0.0).unwrap());
        }
        // identical elements under the same stretch
        assert!((forces[0] - forces[3]).norm() < 1e-6 * forces[0].norm());
    }

    #[test]
    fn first_failure_is_reported() {
        let mut nodes = NodeStore::new();
        let elements = bar(&mut nodes, 2);
        assert_eq!(internal_forces(&elements), Err(ElementError::NotInitialized));
    }
}

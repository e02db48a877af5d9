//! 4-node linear tetrahedron (constant strain tetrahedron).
//!
//! 3 DOFs per vertex, 12 total. Strain is constant over the element.
//! Voigt layout: `[ε_xx, ε_yy, ε_zz, ε_xy, ε_yz, ε_xz]` with tensorial
//! shear.

use crate::element::SimplexElement;
use crate::types::Point3;
use nalgebra::{DMatrix, Matrix3};

/// Linear tetrahedron integrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tet4;

impl SimplexElement for Tet4 {
    fn dim(&self) -> usize {
        3
    }

    fn shear_pairs(&self) -> &'static [(usize, usize)] {
        &[(0, 1), (1, 2), (0, 2)]
    }

    fn shape_gradients(&self, coords: &[Point3]) -> Option<DMatrix<f64>> {
        debug_assert_eq!(coords.len(), 4, "Tet4 takes 4 vertex coordinates");

        // Jacobian columns are the edge vectors from vertex 0; with
        // N₁ = ξ, N₂ = η, N₃ = ζ the gradient of Nᵢ is row i-1 of J⁻¹.
        let e1 = coords[1] - coords[0];
        let e2 = coords[2] - coords[0];
        let e3 = coords[3] - coords[0];
        let j = Matrix3::new(
            e1.x, e2.x, e3.x, //
            e1.y, e2.y, e3.y, //
            e1.z, e2.z, e3.z,
        );
        let j_inv = j.try_inverse()?;

        let mut g = DMatrix::zeros(4, 3);
        for i in 0..3 {
            for c in 0..3 {
                g[(i + 1, c)] = j_inv[(i, c)];
            }
        }
        for c in 0..3 {
            g[(0, c)] = -(g[(1, c)] + g[(2, c)] + g[(3, c)]);
        }
        Some(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_tet() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn reference_gradients() {
        let g = Tet4.shape_gradients(&unit_tet()).unwrap();
        let expected = [
            [-1.0, -1.0, -1.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ];
        for i in 0..4 {
            for c in 0..3 {
                assert_relative_eq!(g[(i, c)], expected[i][c], epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn gradients_reproduce_linear_fields() {
        let coords = vec![
            Point3::new(0.1, 0.2, -0.3),
            Point3::new(1.4, 0.1, 0.2),
            Point3::new(0.3, 1.8, 0.4),
            Point3::new(-0.2, 0.5, 1.6),
        ];
        let g = Tet4.shape_gradients(&coords).unwrap();
        for a in 0..3 {
            for b in 0..3 {
                let sum: f64 = (0..4).map(|i| g[(i, a)] * coords[i][b]).sum();
                let expected = if a == b { 1.0 } else { 0.0 };
                assert_relative_eq!(sum, expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn strain_displacement_layout() {
        let g = Tet4.shape_gradients(&unit_tet()).unwrap();
        let b = Tet4.strain_displacement(&g);
        assert_eq!((b.nrows(), b.ncols()), (6, 12));
        // Vertex 3 carries ∇N₃ = (0, 0, 1): ε_zz takes it at the w
        // column, ε_yz and ε_xz take half at the v and u columns.
        assert_relative_eq!(b[(2, 11)], 1.0);
        assert_relative_eq!(b[(4, 10)], 0.5);
        assert_relative_eq!(b[(5, 9)], 0.5);
        assert_relative_eq!(b[(3, 9)], 0.0);
    }

    #[test]
    fn coplanar_vertices_are_degenerate() {
        let coords = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        assert!(Tet4.shape_gradients(&coords).is_none());
    }
}

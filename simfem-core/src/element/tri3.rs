//! 3-node linear triangle (constant strain triangle).
//!
//! 2 DOFs per vertex, 6 total. Strain is constant over the element, so
//! the single closed-form evaluation is exact. Voigt layout:
//! `[ε_xx, ε_yy, ε_xy]` with tensorial shear.

use crate::element::SimplexElement;
use crate::types::Point3;
use nalgebra::{DMatrix, Matrix2};

/// Linear triangle integrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tri3;

impl SimplexElement for Tri3 {
    fn dim(&self) -> usize {
        2
    }

    fn shear_pairs(&self) -> &'static [(usize, usize)] {
        &[(0, 1)]
    }

    fn shape_gradients(&self, coords: &[Point3]) -> Option<DMatrix<f64>> {
        debug_assert_eq!(coords.len(), 3, "Tri3 takes 3 vertex coordinates");

        // Jacobian columns are the edge vectors from vertex 0. In the
        // reference triangle N₁ = ξ and N₂ = η, so ∇Nᵢ is row i-1 of
        // J⁻¹ and ∇N₀ closes the partition of unity.
        let j = Matrix2::new(
            coords[1].x - coords[0].x,
            coords[2].x - coords[0].x,
            coords[1].y - coords[0].y,
            coords[2].y - coords[0].y,
        );
        let j_inv = j.try_inverse()?;

        let mut g = DMatrix::zeros(3, 2);
        for i in 0..2 {
            for c in 0..2 {
                g[(i + 1, c)] = j_inv[(i, c)];
            }
        }
        for c in 0..2 {
            g[(0, c)] = -(g[(1, c)] + g[(2, c)]);
        }
        Some(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn reference_gradients() {
        let g = Tri3.shape_gradients(&unit_triangle()).unwrap();
        let expected = [[-1.0, -1.0], [1.0, 0.0], [0.0, 1.0]];
        for i in 0..3 {
            for c in 0..2 {
                assert_relative_eq!(g[(i, c)], expected[i][c], epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn gradients_reproduce_linear_fields() {
        // Σᵢ ∇Nᵢ ⊗ xᵢ must equal the identity for any triangle.
        let coords = vec![
            Point3::new(0.3, 0.9, 0.0),
            Point3::new(2.1, 1.2, 0.0),
            Point3::new(0.7, 3.0, 0.0),
        ];
        let g = Tri3.shape_gradients(&coords).unwrap();
        for a in 0..2 {
            for b in 0..2 {
                let sum: f64 = (0..3).map(|i| g[(i, a)] * coords[i][b]).sum();
                let expected = if a == b { 1.0 } else { 0.0 };
                assert_relative_eq!(sum, expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn strain_displacement_layout() {
        let g = Tri3.shape_gradients(&unit_triangle()).unwrap();
        let b = Tri3.strain_displacement(&g);
        assert_eq!((b.nrows(), b.ncols()), (3, 6));
        // Vertex 1 carries ∇N₁ = (1, 0): ε_xx picks it up at the u
        // column, the tensorial shear row takes half at the v column.
        assert_relative_eq!(b[(0, 2)], 1.0);
        assert_relative_eq!(b[(1, 3)], 0.0);
        assert_relative_eq!(b[(2, 2)], 0.0);
        assert_relative_eq!(b[(2, 3)], 0.5);
    }

    #[test]
    fn collinear_vertices_are_degenerate() {
        let coords = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
        ];
        assert!(Tri3.shape_gradients(&coords).is_none());
    }
}

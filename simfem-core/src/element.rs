//! Element integrators for linear simplices.
//!
//! Linear shape functions over a simplex have constant gradients, so
//! every local operator here is closed form: no quadrature rule, no
//! integration error. The dimension-specific pieces (Jacobian, Voigt
//! shear layout) live in [`Tri3`] and [`Tet4`]; the shared algebra is
//! implemented once on the trait.
//!
//! Element measures (areas/volumes) are *not* recomputed from
//! coordinates — they arrive from the mesh's precomputed attributes so
//! local matrices stay bit-consistent with the geometry used elsewhere.

use crate::types::{double_shear_rows, strain_components, Point3};
use nalgebra::{DMatrix, DVector};

pub mod tet4;
pub mod tri3;

pub use tet4::Tet4;
pub use tri3::Tri3;

/// Closed-form integrator for one simplex type.
///
/// Implementations must be thread-safe (`Send + Sync`): the assembler
/// evaluates elements in parallel.
pub trait SimplexElement: Send + Sync {
    /// Spatial dimension (2 or 3).
    fn dim(&self) -> usize;

    /// Vertices per element: `dim + 1` for a simplex.
    fn n_nodes(&self) -> usize {
        self.dim() + 1
    }

    /// Number of Voigt strain components.
    fn strain_dim(&self) -> usize {
        strain_components(self.dim())
    }

    /// Component pairs for the shear rows, in Voigt row order.
    fn shear_pairs(&self) -> &'static [(usize, usize)];

    /// Constant shape-function gradients, one row per vertex
    /// (`n_nodes x dim`), from the inverse element Jacobian.
    ///
    /// Returns `None` when the element is collapsed (singular Jacobian);
    /// the assembler reports that as a degenerate element.
    fn shape_gradients(&self, coords: &[Point3]) -> Option<DMatrix<f64>>;

    /// Strain-displacement matrix B (`strain_dim x n_nodes*dim`).
    ///
    /// Row order: axial components first, then the shear rows named by
    /// [`shear_pairs`](Self::shear_pairs). Shear rows are tensorial,
    /// `ε_ab = (∂u_a/∂x_b + ∂u_b/∂x_a) / 2`.
    fn strain_displacement(&self, gradients: &DMatrix<f64>) -> DMatrix<f64> {
        let dim = self.dim();
        let mut b = DMatrix::zeros(self.strain_dim(), self.n_nodes() * dim);
        for i in 0..self.n_nodes() {
            for c in 0..dim {
                b[(c, i * dim + c)] = gradients[(i, c)];
            }
            for (row, &(p, q)) in self.shear_pairs().iter().enumerate() {
                b[(dim + row, i * dim + p)] = 0.5 * gradients[(i, q)];
                b[(dim + row, i * dim + q)] = 0.5 * gradients[(i, p)];
            }
        }
        b
    }

    /// Local stiffness `Kₑ = measure · Bᵀ·(ShearDoubler·C)·B`.
    ///
    /// `elasticity` is the material tensor in tensorial Voigt form; the
    /// shear-row doubling converts the product to strain energy.
    fn stiffness(
        &self,
        b: &DMatrix<f64>,
        elasticity: &DMatrix<f64>,
        measure: f64,
    ) -> DMatrix<f64> {
        let cb = double_shear_rows(elasticity, self.dim()) * b;
        (b.transpose() * cb) * measure
    }

    /// Consistent mass, `(n_nodes*dim)²` with per-component blocks.
    ///
    /// Exact simplex integral of `ρ Nᵢ Nⱼ`: off-diagonal entries
    /// `ρ·V/((dim+1)(dim+2))`, diagonal twice that, with zero coupling
    /// between displacement components.
    fn consistent_mass(&self, measure: f64, density: f64) -> DMatrix<f64> {
        let dim = self.dim();
        let n = self.n_nodes();
        let off = density * measure / (((dim + 1) * (dim + 2)) as f64);
        let mut m = DMatrix::zeros(n * dim, n * dim);
        for i in 0..n {
            for j in 0..n {
                let value = if i == j { 2.0 * off } else { off };
                for c in 0..dim {
                    m[(i * dim + c, j * dim + c)] = value;
                }
            }
        }
        m
    }

    /// Lumped mass diagonal: the row sum `ρ·V/(dim+1)` per vertex DOF.
    /// Total mass per component is preserved exactly.
    fn lumped_mass(&self, measure: f64, density: f64) -> DVector<f64> {
        let dim = self.dim();
        DVector::from_element(
            self.n_nodes() * dim,
            density * measure / ((dim + 1) as f64),
        )
    }

    /// Scalar diffusion block, `measure · ∇Nᵢ·∇Nⱼ`
    /// (`n_nodes x n_nodes`). Independent of the material.
    fn laplacian(&self, gradients: &DMatrix<f64>, measure: f64) -> DMatrix<f64> {
        (gradients * gradients.transpose()) * measure
    }
}

/// The integrator for a mesh dimension.
pub fn for_dimension(dim: usize) -> &'static dyn SimplexElement {
    debug_assert!(dim == 2 || dim == 3);
    if dim == 2 {
        &Tri3
    } else {
        &Tet4
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
    fn gradients_sum_to_zero() {
        // Partition of unity: Σᵢ Nᵢ = 1, so the gradients close.
        let coords = vec![
            Point3::new(0.2, -0.1, 0.0),
            Point3::new(1.7, 0.3, 0.0),
            Point3::new(0.4, 2.1, 0.0),
        ];
        let g = Tri3.shape_gradients(&coords).unwrap();
        for c in 0..2 {
            let sum: f64 = (0..3).map(|i| g[(i, c)]).sum();
            assert_relative_eq!(sum, 0.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn rigid_translation_produces_no_strain() {
        let g = Tri3.shape_gradients(&unit_triangle()).unwrap();
        let b = Tri3.strain_displacement(&g);
        // Uniform displacement (1, 1) at every vertex.
        let u = DVector::from_element(6, 1.0);
        let strain = &b * &u;
        for r in 0..3 {
            assert_relative_eq!(strain[r], 0.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn mass_row_sums_match_lumped_diagonal() {
        for element in [&Tri3 as &dyn SimplexElement, &Tet4] {
            let (measure, density) = (0.37, 2700.0);
            let m = element.consistent_mass(measure, density);
            let lumped = element.lumped_mass(measure, density);
            for i in 0..m.nrows() {
                let row_sum: f64 = m.row(i).iter().sum();
                assert_relative_eq!(row_sum, lumped[i], max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn laplacian_rows_sum_to_zero() {
        let coords = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.1, 0.0),
            Point3::new(0.3, 1.4, 0.0),
        ];
        let g = Tri3.shape_gradients(&coords).unwrap();
        let l = Tri3.laplacian(&g, 0.5);
        for i in 0..3 {
            let row_sum: f64 = l.row(i).iter().sum();
            assert_relative_eq!(row_sum, 0.0, epsilon = 1e-12);
            assert!(l[(i, i)] >= 0.0);
        }
    }

    #[test]
    fn stiffness_is_symmetric_and_kills_translations() {
        let material =
            crate::material::Material::create_isotropic(2, 7850.0, 200e9, 0.3).unwrap();
        let g = Tri3.shape_gradients(&unit_triangle()).unwrap();
        let b = Tri3.strain_displacement(&g);
        let k = Tri3.stiffness(&b, material.elasticity_tensor(), 0.5);

        for i in 0..6 {
            for j in 0..6 {
                assert_relative_eq!(k[(i, j)], k[(j, i)], max_relative = 1e-10);
            }
        }
        let u = DVector::from_element(6, 1.0);
        let f = &k * &u;
        for i in 0..6 {
            assert_relative_eq!(f[i] / k[(0, 0)], 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn factory_selects_by_dimension() {
        assert_eq!(for_dimension(2).n_nodes(), 3);
        assert_eq!(for_dimension(3).n_nodes(), 4);
    }
}

//! Core data types and Voigt-layout helpers.
//!
//! Strain and stress vectors use tensorial Voigt ordering:
//!
//! - 2D: `[ε_xx, ε_yy, ε_xy]`
//! - 3D: `[ε_xx, ε_yy, ε_zz, ε_xy, ε_yz, ε_xz]`
//!
//! Shear components are *tensorial* (ε_xy, not the engineering γ_xy =
//! 2ε_xy); the axial rows come first, so the shear rows of any per-element
//! Voigt block occupy indices `dim..strain_components(dim)`. Converting a
//! tensorial-energy product to the engineering convention multiplies
//! exactly those rows by 2.

use nalgebra::{DMatrix, Vector3};

/// A point in space. 2D meshes store z = 0.
pub type Point3 = Vector3<f64>;

/// A spatial vector (displacement, rotation axis, etc.).
pub type Vec3 = Vector3<f64>;

/// Number of independent strain components in Voigt notation.
pub fn strain_components(dim: usize) -> usize {
    debug_assert!(dim == 2 || dim == 3);
    if dim == 2 {
        3
    } else {
        6
    }
}

/// Row range of the shear components within a Voigt block.
pub fn shear_rows(dim: usize) -> std::ops::Range<usize> {
    dim..strain_components(dim)
}

/// Number of infinitesimal rigid-body modes: translations plus
/// rotations, `dim * (dim + 1) / 2`.
pub fn rigid_mode_count(dim: usize) -> usize {
    debug_assert!(dim == 2 || dim == 3);
    dim * (dim + 1) / 2
}

/// Copy of a Voigt block with its shear rows multiplied by 2, converting
/// a tensorial-shear product to the engineering convention.
pub fn double_shear_rows(block: &DMatrix<f64>, dim: usize) -> DMatrix<f64> {
    let mut doubled = block.clone();
    for r in shear_rows(dim) {
        for j in 0..doubled.ncols() {
            doubled[(r, j)] *= 2.0;
        }
    }
    doubled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strain_components_per_dimension() {
        assert_eq!(strain_components(2), 3);
        assert_eq!(strain_components(3), 6);
    }

    #[test]
    fn shear_rows_follow_axial_rows() {
        assert_eq!(shear_rows(2).collect::<Vec<_>>(), vec![2]);
        assert_eq!(shear_rows(3).collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn rigid_modes_per_dimension() {
        assert_eq!(rigid_mode_count(2), 3);
        assert_eq!(rigid_mode_count(3), 6);
    }

    #[test]
    fn shear_doubling_touches_only_shear_rows() {
        let block = DMatrix::from_element(3, 3, 1.0);
        let doubled = double_shear_rows(&block, 2);
        for j in 0..3 {
            assert_eq!(doubled[(0, j)], 1.0);
            assert_eq!(doubled[(1, j)], 1.0);
            assert_eq!(doubled[(2, j)], 2.0);
        }
    }
}

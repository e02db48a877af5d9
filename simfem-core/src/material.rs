//! Material model: density plus the isotropic elasticity tensor.
//!
//! The elasticity tensor is stored in *tensorial* Voigt form: it maps
//! tensorial strain `[ε_xx, ε_yy, (ε_zz,) ε_xy, ...]` to stress, so the
//! shear diagonal carries `2μ` (σ_xy = 2μ ε_xy). Assembly applies the
//! engineering shear doubling explicitly where the energy product needs
//! it, which keeps the stiffness decomposition
//! `K = Bᵀ·A·ShearDoubler·D·B` an exact identity.

use crate::error::{Error, Result};
use crate::types::strain_components;
use nalgebra::DMatrix;

/// Named presets: (name, density, Young's modulus, Poisson ratio).
/// SI units (kg/m³, Pa).
const PRESETS: &[(&str, f64, f64, f64)] = &[
    // Unit material with the identity elasticity tensor, used by the
    // ground-truth suite.
    ("test_material", 1.0, 1.0, 0.0),
    // Structural steel.
    ("steel", 7850.0, 200e9, 0.3),
    // Aluminum 6061-T6.
    ("aluminum", 2700.0, 68.9e9, 0.33),
    // Titanium Ti-6Al-4V.
    ("titanium", 4430.0, 113.8e9, 0.342),
];

/// Isotropic linear-elastic material.
///
/// Immutable value object: construct once, share by reference or clone.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    dim: usize,
    density: f64,
    elasticity: DMatrix<f64>,
}

impl Material {
    /// Create an isotropic material from engineering constants.
    ///
    /// Uses the standard Lamé relations, μ = E / (2(1+ν)) in both
    /// dimensions, λ = Eν / ((1+ν)(1−2ν)) in 3D and the plane-stress
    /// reduced λ̄ = Eν / (1−ν²) in 2D.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `dim` is not 2 or 3, `young_modulus <= 0`,
    /// `density <= 0`, or `poisson_ratio` lies outside (−1, ½), where
    /// the tensor stops being positive definite.
    pub fn create_isotropic(
        dim: usize,
        density: f64,
        young_modulus: f64,
        poisson_ratio: f64,
    ) -> Result<Self> {
        if dim != 2 && dim != 3 {
            return Err(Error::InvalidParameter(format!(
                "material dimension must be 2 or 3, got {}",
                dim
            )));
        }
        if young_modulus <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "Young's modulus must be positive, got {}",
                young_modulus
            )));
        }
        if density <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "density must be positive, got {}",
                density
            )));
        }
        if poisson_ratio <= -1.0 || poisson_ratio >= 0.5 {
            return Err(Error::InvalidParameter(format!(
                "Poisson ratio must lie in (-1, 0.5), got {}",
                poisson_ratio
            )));
        }

        let mu = young_modulus / (2.0 * (1.0 + poisson_ratio));
        let lambda = if dim == 2 {
            young_modulus * poisson_ratio / (1.0 - poisson_ratio * poisson_ratio)
        } else {
            young_modulus * poisson_ratio
                / ((1.0 + poisson_ratio) * (1.0 - 2.0 * poisson_ratio))
        };

        Ok(Self {
            dim,
            density,
            elasticity: isotropic_tensor(dim, lambda, mu),
        })
    }

    /// Look up a named preset and build it for the given dimension.
    ///
    /// # Errors
    ///
    /// `UnknownMaterial` if the name is not in the preset table.
    pub fn from_name(dim: usize, name: &str) -> Result<Self> {
        let (_, density, young, poisson) = *PRESETS
            .iter()
            .find(|(preset, ..)| *preset == name)
            .ok_or_else(|| Error::UnknownMaterial(name.to_string()))?;
        Self::create_isotropic(dim, density, young, poisson)
    }

    /// Names accepted by [`Material::from_name`].
    pub fn preset_names() -> impl Iterator<Item = &'static str> {
        PRESETS.iter().map(|(name, ..)| *name)
    }

    /// Spatial dimension (2 or 3).
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Mass density ρ.
    pub fn density(&self) -> f64 {
        self.density
    }

    /// The elasticity tensor C in tensorial Voigt form
    /// (3×3 in 2D, 6×6 in 3D).
    pub fn elasticity_tensor(&self) -> &DMatrix<f64> {
        &self.elasticity
    }

    /// Number of Voigt strain components (3 in 2D, 6 in 3D).
    pub fn strain_dim(&self) -> usize {
        strain_components(self.dim)
    }
}

/// Isotropic elasticity tensor in tensorial Voigt form.
fn isotropic_tensor(dim: usize, lambda: f64, mu: f64) -> DMatrix<f64> {
    let sd = strain_components(dim);
    let mut c = DMatrix::zeros(sd, sd);
    for i in 0..dim {
        for j in 0..dim {
            c[(i, j)] = lambda;
        }
        c[(i, i)] = lambda + 2.0 * mu;
    }
    for k in dim..sd {
        c[(k, k)] = 2.0 * mu;
    }
    c
}

//! Global operator assembly.
//!
//! [`FEAssembler`] binds one mesh + material pair and dispatches
//! assembly requests by operator name. Per-element local matrices are
//! computed in parallel with Rayon; each element produces a dense block
//! plus its global indices, and the blocks are merged into the sparse
//! triplet buffer in element order. The merge is sequential and
//! deterministic, so repeated assembly yields bitwise-identical
//! operators regardless of thread scheduling.
//!
//! Global DOF indexing is `dof(v, c) = v * dim + c`. Per-element strain
//! rows are `e * strain_dim + r` in Voigt order.

use crate::element::{for_dimension, SimplexElement};
use crate::error::{Error, Result};
use crate::material::Material;
use crate::mesh::SimplexMesh;
use crate::sparse::{CsrMatrix, TripletMatrix};
use crate::types::{double_shear_rows, rigid_mode_count, strain_components, Vec3};
use nalgebra::DMatrix;
use rayon::prelude::*;
use std::str::FromStr;

/// The closed set of assemblable operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Elastic stiffness, `(N·dim)²`, symmetric PSD.
    Stiffness,
    /// Consistent mass, `(N·dim)²`.
    Mass,
    /// Diagonal row-sum mass, `(N·dim)²`.
    LumpedMass,
    /// Scalar FE Laplacian, `N²`, material-free.
    Laplacian,
    /// Displacement-to-strain blocks, `(M·strain_dim) x (N·dim)`.
    DisplacementStrain,
    /// Block-diagonal elasticity tensor, `(M·strain_dim)²`.
    ElasticityTensor,
    /// Elasticity tensor with shear rows doubled (engineering shear).
    EngineerStrainStress,
    /// Rigid-body mode basis, `modes x (N·dim)`.
    RigidMotion,
}

impl Operator {
    /// Every operator, in dispatch-table order.
    pub const ALL: [Operator; 8] = [
        Operator::Stiffness,
        Operator::Mass,
        Operator::LumpedMass,
        Operator::Laplacian,
        Operator::DisplacementStrain,
        Operator::ElasticityTensor,
        Operator::EngineerStrainStress,
        Operator::RigidMotion,
    ];

    /// The wire name used by [`FEAssembler::assemble`].
    pub fn name(self) -> &'static str {
        match self {
            Operator::Stiffness => "stiffness",
            Operator::Mass => "mass",
            Operator::LumpedMass => "lumped_mass",
            Operator::Laplacian => "laplacian",
            Operator::DisplacementStrain => "displacement_strain",
            Operator::ElasticityTensor => "elasticity_tensor",
            Operator::EngineerStrainStress => "engineer_strain_stress",
            Operator::RigidMotion => "rigid_motion",
        }
    }

    /// Resolve a wire name, or `UnknownOperator`.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.name() == name)
            .ok_or_else(|| Error::UnknownOperator(name.to_string()))
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

/// Assembly configuration.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyOptions {
    /// Elements whose measure is at or below this threshold are
    /// rejected as degenerate (collapsed or inverted).
    pub degeneracy_eps: f64,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            degeneracy_eps: 1e-12,
        }
    }
}

/// Finite-element assembler facade.
///
/// Borrows the mesh, owns the (cheap, immutable) material value and is
/// stateless across calls: every [`assemble`](Self::assemble) is an
/// independent, repeatable computation.
pub struct FEAssembler<'a> {
    mesh: &'a SimplexMesh,
    material: Material,
    options: AssemblyOptions,
}

impl<'a> FEAssembler<'a> {
    /// Bind a mesh and an explicit material.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the material dimension differs from the
    /// mesh dimension.
    pub fn create(mesh: &'a SimplexMesh, material: Material) -> Result<Self> {
        if material.dimension() != mesh.dim() {
            return Err(Error::DimensionMismatch {
                material: material.dimension(),
                mesh: mesh.dim(),
            });
        }
        Ok(Self {
            mesh,
            material,
            options: AssemblyOptions::default(),
        })
    }

    /// Bind a mesh and a named material preset.
    pub fn create_from_name(mesh: &'a SimplexMesh, material_name: &str) -> Result<Self> {
        let material = Material::from_name(mesh.dim(), material_name)?;
        Self::create(mesh, material)
    }

    /// Override the default [`AssemblyOptions`].
    pub fn with_options(mut self, options: AssemblyOptions) -> Self {
        self.options = options;
        self
    }

    /// The bound material.
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// The bound mesh.
    pub fn mesh(&self) -> &SimplexMesh {
        self.mesh
    }

    /// Assemble an operator by wire name.
    ///
    /// # Errors
    ///
    /// `UnknownOperator` for names outside [`Operator::ALL`], plus any
    /// error of [`assemble_operator`](Self::assemble_operator).
    pub fn assemble(&self, operator_name: &str) -> Result<CsrMatrix> {
        self.assemble_operator(Operator::from_name(operator_name)?)
    }

    /// Assemble an operator.
    ///
    /// # Errors
    ///
    /// `MissingAttribute` when the mesh lacks a required precomputed
    /// measure, `DegenerateElement` for collapsed elements. Assembly
    /// either fully succeeds or fails without partial results.
    pub fn assemble_operator(&self, operator: Operator) -> Result<CsrMatrix> {
        match operator {
            Operator::Stiffness => self.stiffness(),
            Operator::Mass => self.mass(),
            Operator::LumpedMass => self.lumped_mass(),
            Operator::Laplacian => self.laplacian(),
            Operator::DisplacementStrain => self.displacement_strain(),
            Operator::ElasticityTensor => self.elasticity_blocks(false),
            Operator::EngineerStrainStress => self.elasticity_blocks(true),
            Operator::RigidMotion => self.rigid_motion(),
        }
    }

    fn element(&self) -> &'static dyn SimplexElement {
        for_dimension(self.mesh.dim())
    }

    /// Global DOF indices of one element, `dof(v, c) = v*dim + c`.
    fn element_dofs(&self, element: usize) -> Vec<usize> {
        let dim = self.mesh.dim();
        self.mesh
            .element(element)
            .iter()
            .flat_map(|&v| (0..dim).map(move |c| v * dim + c))
            .collect()
    }

    fn checked_measure(&self, element: usize, measures: &[f64]) -> Result<f64> {
        let measure = measures[element];
        if measure <= self.options.degeneracy_eps {
            return Err(Error::DegenerateElement { element, measure });
        }
        Ok(measure)
    }

    fn gradients(&self, element: usize) -> Result<DMatrix<f64>> {
        let coords = self.mesh.element_coords(element);
        self.element()
            .shape_gradients(&coords)
            .ok_or(Error::DegenerateElement {
                element,
                measure: 0.0,
            })
    }

    /// Parallel per-element map followed by a sequential, element-ordered
    /// merge into the global triplet buffer. Ordering the merge keeps the
    /// floating-point accumulation deterministic per run.
    fn scatter_elements<F>(
        &self,
        n_rows: usize,
        n_cols: usize,
        nnz_estimate: usize,
        local: F,
    ) -> Result<CsrMatrix>
    where
        F: Fn(usize) -> Result<(Vec<usize>, Vec<usize>, DMatrix<f64>)> + Send + Sync,
    {
        let blocks = (0..self.mesh.n_elements())
            .into_par_iter()
            .map(local)
            .collect::<Result<Vec<_>>>()?;

        let mut triplets = TripletMatrix::with_capacity(n_rows, n_cols, nnz_estimate);
        for (rows, cols, block) in &blocks {
            triplets.add_block(rows, cols, block);
        }
        Ok(triplets.to_csr())
    }

    fn stiffness(&self) -> Result<CsrMatrix> {
        let n_dofs = self.mesh.n_nodes() * self.mesh.dim();
        let measures = self.mesh.element_measures()?;
        let element = self.element();
        let block = element.n_nodes() * self.mesh.dim();
        self.scatter_elements(
            n_dofs,
            n_dofs,
            self.mesh.n_elements() * block * block,
            |e| {
                let measure = self.checked_measure(e, measures)?;
                let g = self.gradients(e)?;
                let b = element.strain_displacement(&g);
                let ke = element.stiffness(&b, self.material.elasticity_tensor(), measure);
                let dofs = self.element_dofs(e);
                Ok((dofs.clone(), dofs, ke))
            },
        )
    }

    fn mass(&self) -> Result<CsrMatrix> {
        let n_dofs = self.mesh.n_nodes() * self.mesh.dim();
        let measures = self.mesh.element_measures()?;
        let density = self.material.density();
        let element = self.element();
        let block = element.n_nodes() * self.mesh.dim();
        self.scatter_elements(
            n_dofs,
            n_dofs,
            self.mesh.n_elements() * block * block,
            |e| {
                let measure = self.checked_measure(e, measures)?;
                let me = element.consistent_mass(measure, density);
                let dofs = self.element_dofs(e);
                Ok((dofs.clone(), dofs, me))
            },
        )
    }

    fn lumped_mass(&self) -> Result<CsrMatrix> {
        let n_dofs = self.mesh.n_nodes() * self.mesh.dim();
        let measures = self.mesh.element_measures()?;
        let density = self.material.density();
        let element = self.element();
        let block = element.n_nodes() * self.mesh.dim();
        self.scatter_elements(n_dofs, n_dofs, self.mesh.n_elements() * block, |e| {
            let measure = self.checked_measure(e, measures)?;
            let diag = element.lumped_mass(measure, density);
            let dofs = self.element_dofs(e);
            Ok((dofs.clone(), dofs, DMatrix::from_diagonal(&diag)))
        })
    }

    fn laplacian(&self) -> Result<CsrMatrix> {
        let n = self.mesh.n_nodes();
        let measures = self.mesh.element_measures()?;
        let element = self.element();
        let arity = element.n_nodes();
        self.scatter_elements(n, n, self.mesh.n_elements() * arity * arity, |e| {
            let measure = self.checked_measure(e, measures)?;
            let g = self.gradients(e)?;
            let le = element.laplacian(&g, measure);
            let vertices = self.mesh.element(e).to_vec();
            Ok((vertices.clone(), vertices, le))
        })
    }

    fn displacement_strain(&self) -> Result<CsrMatrix> {
        let sd = strain_components(self.mesh.dim());
        let n_dofs = self.mesh.n_nodes() * self.mesh.dim();
        let element = self.element();
        let block = element.n_nodes() * self.mesh.dim();
        self.scatter_elements(
            self.mesh.n_elements() * sd,
            n_dofs,
            self.mesh.n_elements() * sd * block,
            |e| {
                let g = self.gradients(e)?;
                let b = element.strain_displacement(&g);
                let rows = (e * sd..(e + 1) * sd).collect();
                Ok((rows, self.element_dofs(e), b))
            },
        )
    }

    /// Block-diagonal elasticity tensor; `doubled` selects the
    /// engineering-shear variant.
    fn elasticity_blocks(&self, doubled: bool) -> Result<CsrMatrix> {
        let sd = self.material.strain_dim();
        let block = if doubled {
            double_shear_rows(self.material.elasticity_tensor(), self.mesh.dim())
        } else {
            self.material.elasticity_tensor().clone()
        };
        let size = self.mesh.n_elements() * sd;
        self.scatter_elements(size, size, self.mesh.n_elements() * sd * sd, |e| {
            let rows: Vec<usize> = (e * sd..(e + 1) * sd).collect();
            Ok((rows.clone(), rows, block.clone()))
        })
    }

    /// Rigid-body mode basis: one row per mode, translations first,
    /// then infinitesimal rotations about each axis through the
    /// vertex-measure-weighted centroid. Rows are pure rigid fields;
    /// vertex weights enter only through the centroid.
    fn rigid_motion(&self) -> Result<CsrMatrix> {
        let dim = self.mesh.dim();
        let n = self.mesh.n_nodes();
        let weights = self.mesh.vertex_measures()?;
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(Error::Mesh(
                "total vertex measure is not positive".to_string(),
            ));
        }
        let mut centroid = Vec3::zeros();
        for (v, node) in self.mesh.nodes().iter().enumerate() {
            centroid += node * weights[v];
        }
        centroid /= total;

        let n_modes = rigid_mode_count(dim);
        let mut triplets = TripletMatrix::with_capacity(n_modes, n * dim, n_modes * n * dim);
        for axis in 0..dim {
            for v in 0..n {
                triplets.add(axis, v * dim + axis, 1.0);
            }
        }
        let axes = if dim == 2 {
            vec![Vec3::z()]
        } else {
            vec![Vec3::x(), Vec3::y(), Vec3::z()]
        };
        for (mode, axis) in axes.iter().enumerate() {
            for (v, node) in self.mesh.nodes().iter().enumerate() {
                let u = axis.cross(&(node - &centroid));
                for c in 0..dim {
                    triplets.add(dim + mode, v * dim + c, u[c]);
                }
            }
        }
        Ok(triplets.to_csr())
    }
}

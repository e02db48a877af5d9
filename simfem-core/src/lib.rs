//! simfem-core - Finite Element Matrix Assembly for Simplicial Meshes
//!
//! Builds the standard family of global sparse operators used in
//! solid-mechanics and diffusion simulation from a simplicial mesh
//! (triangles in 2D, tetrahedra in 3D) and a material model:
//!
//! - Stiffness, consistent mass and lumped mass
//! - Scalar FE Laplacian
//! - Displacement-to-strain operator and block-diagonal elasticity tensor
//! - Engineering (Voigt) strain-stress operator
//! - Rigid-body-motion basis operator
//!
//! Linear simplices integrate in closed form, so element matrices are
//! exact — no quadrature. The element loop runs in parallel with Rayon
//! and merges per-element contributions deterministically.
//!
//! # Architecture
//!
//! - [`SimplexMesh`]: coordinates, connectivity and precomputed measure
//!   attributes, supplied by the caller
//! - [`Material`]: density plus the isotropic elasticity tensor in
//!   tensorial Voigt form
//! - [`SimplexElement`] trait: per-element closed-form integration
//!   ([`Tri3`] and [`Tet4`])
//! - [`FEAssembler`]: facade dispatching [`Operator`] requests into
//!   global [`CsrMatrix`] operators
//!
//! # Example
//!
//! ```
//! use simfem_core::{FEAssembler, SimplexMesh};
//!
//! // Unit triangle with its area and per-vertex areas attached.
//! let mut mesh = SimplexMesh::new(2).unwrap();
//! mesh.add_node(&[0.0, 0.0]).unwrap();
//! mesh.add_node(&[1.0, 0.0]).unwrap();
//! mesh.add_node(&[0.0, 1.0]).unwrap();
//! mesh.add_element(&[0, 1, 2]).unwrap();
//! mesh.set_element_measures(vec![0.5]).unwrap();
//!
//! let assembler = FEAssembler::create_from_name(&mesh, "steel").unwrap();
//! let stiffness = assembler.assemble("stiffness").unwrap();
//! assert_eq!(stiffness.nrows(), 6);
//! ```

pub mod assembly;
pub mod element;
pub mod error;
pub mod material;
pub mod mesh;
pub mod sparse;
pub mod types;

pub use assembly::{AssemblyOptions, FEAssembler, Operator};
pub use element::{SimplexElement, Tet4, Tri3};
pub use error::{Error, Result};
pub use material::Material;
pub use mesh::SimplexMesh;
pub use sparse::{CsrMatrix, TripletMatrix};
pub use types::{Point3, Vec3};

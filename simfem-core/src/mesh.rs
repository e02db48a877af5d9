//! Simplicial mesh data structure.
//!
//! Stores vertex coordinates, element connectivity and the precomputed
//! measure attributes assembly consumes. The mesh never computes
//! geometry itself: element measures (face areas in 2D, voxel volumes in
//! 3D) and vertex measures (the lumped dual areas/volumes) are produced
//! by an external pre-pass and attached here, so that assembly stays
//! bit-consistent with the attributes used elsewhere in the pipeline.
//!
//! Connectivity is validated on insertion; the no-isolated-vertices
//! invariant is the caller's responsibility.

use crate::error::{Error, Result};
use crate::types::Point3;

/// Attribute names, kept from the original mesh pipeline so error
/// messages point at the attribute the caller must request.
fn element_measure_name(dim: usize) -> &'static str {
    if dim == 2 {
        "face_area"
    } else {
        "voxel_volume"
    }
}

fn vertex_measure_name(dim: usize) -> &'static str {
    if dim == 2 {
        "vertex_area"
    } else {
        "vertex_volume"
    }
}

/// Simplicial mesh: triangles in 2D, tetrahedra in 3D.
#[derive(Debug, Clone)]
pub struct SimplexMesh {
    dim: usize,
    nodes: Vec<Point3>,
    /// Flattened connectivity, `dim + 1` vertex indices per element.
    connectivity: Vec<usize>,
    element_measures: Option<Vec<f64>>,
    vertex_measures: Option<Vec<f64>>,
}

impl SimplexMesh {
    /// Create an empty mesh of the given spatial dimension (2 or 3).
    pub fn new(dim: usize) -> Result<Self> {
        if dim != 2 && dim != 3 {
            return Err(Error::InvalidParameter(format!(
                "mesh dimension must be 2 or 3, got {}",
                dim
            )));
        }
        Ok(Self {
            dim,
            nodes: Vec::new(),
            connectivity: Vec::new(),
            element_measures: None,
            vertex_measures: None,
        })
    }

    /// Build a mesh from flat coordinate (N x dim) and connectivity
    /// (M x (dim+1)) tables.
    pub fn from_tables(dim: usize, coords: &[f64], connectivity: &[usize]) -> Result<Self> {
        let mut mesh = Self::new(dim)?;
        if coords.len() % dim != 0 {
            return Err(Error::Mesh(format!(
                "coordinate table length {} is not a multiple of dim {}",
                coords.len(),
                dim
            )));
        }
        for point in coords.chunks_exact(dim) {
            mesh.add_node(point)?;
        }
        let arity = dim + 1;
        if connectivity.len() % arity != 0 {
            return Err(Error::Mesh(format!(
                "connectivity table length {} is not a multiple of {}",
                connectivity.len(),
                arity
            )));
        }
        for element in connectivity.chunks_exact(arity) {
            mesh.add_element(element)?;
        }
        Ok(mesh)
    }

    /// Add a vertex, returning its index. `coords` must have `dim` entries.
    pub fn add_node(&mut self, coords: &[f64]) -> Result<usize> {
        if coords.len() != self.dim {
            return Err(Error::Mesh(format!(
                "node needs {} coordinates, got {}",
                self.dim,
                coords.len()
            )));
        }
        let z = if self.dim == 3 { coords[2] } else { 0.0 };
        let idx = self.nodes.len();
        self.nodes.push(Point3::new(coords[0], coords[1], z));
        Ok(idx)
    }

    /// Add an element, returning its index. `vertices` must hold
    /// `dim + 1` in-bounds vertex indices.
    pub fn add_element(&mut self, vertices: &[usize]) -> Result<usize> {
        let arity = self.dim + 1;
        if vertices.len() != arity {
            return Err(Error::Mesh(format!(
                "element needs {} vertices, got {}",
                arity,
                vertices.len()
            )));
        }
        for &v in vertices {
            if v >= self.nodes.len() {
                return Err(Error::Mesh(format!(
                    "vertex index {} out of bounds (mesh has {} nodes)",
                    v,
                    self.nodes.len()
                )));
            }
        }
        let idx = self.n_elements();
        self.connectivity.extend_from_slice(vertices);
        Ok(idx)
    }

    /// Attach per-element measures (`face_area` / `voxel_volume`).
    pub fn set_element_measures(&mut self, measures: Vec<f64>) -> Result<()> {
        if measures.len() != self.n_elements() {
            return Err(Error::Mesh(format!(
                "{} values for attribute {:?}, mesh has {} elements",
                measures.len(),
                element_measure_name(self.dim),
                self.n_elements()
            )));
        }
        self.element_measures = Some(measures);
        Ok(())
    }

    /// Attach per-vertex measures (`vertex_area` / `vertex_volume`).
    pub fn set_vertex_measures(&mut self, measures: Vec<f64>) -> Result<()> {
        if measures.len() != self.n_nodes() {
            return Err(Error::Mesh(format!(
                "{} values for attribute {:?}, mesh has {} nodes",
                measures.len(),
                vertex_measure_name(self.dim),
                self.n_nodes()
            )));
        }
        self.vertex_measures = Some(measures);
        Ok(())
    }

    /// Spatial dimension (2 or 3).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of vertices.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements.
    pub fn n_elements(&self) -> usize {
        self.connectivity.len() / (self.dim + 1)
    }

    /// Vertices per element (`dim + 1` for simplices).
    pub fn nodes_per_element(&self) -> usize {
        self.dim + 1
    }

    /// All vertex coordinates.
    pub fn nodes(&self) -> &[Point3] {
        &self.nodes
    }

    /// One vertex's coordinates.
    pub fn node(&self, idx: usize) -> &Point3 {
        &self.nodes[idx]
    }

    /// Vertex indices of one element.
    pub fn element(&self, idx: usize) -> &[usize] {
        let arity = self.dim + 1;
        &self.connectivity[idx * arity..(idx + 1) * arity]
    }

    /// Coordinates of one element's vertices.
    pub fn element_coords(&self, idx: usize) -> Vec<Point3> {
        self.element(idx).iter().map(|&v| self.nodes[v]).collect()
    }

    /// Per-element measures, or `MissingAttribute` if not attached.
    pub fn element_measures(&self) -> Result<&[f64]> {
        self.element_measures
            .as_deref()
            .ok_or(Error::MissingAttribute(element_measure_name(self.dim)))
    }

    /// Per-vertex measures, or `MissingAttribute` if not attached.
    pub fn vertex_measures(&self) -> Result<&[f64]> {
        self.vertex_measures
            .as_deref()
            .ok_or(Error::MissingAttribute(vertex_measure_name(self.dim)))
    }
}

//! Error types for assembly operations.

use thiserror::Error;

/// Result type alias using the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing materials, meshes or
/// assembling operators.
///
/// All failures are synchronous validation/construction errors: assembly
/// is deterministic, so retrying with the same inputs reproduces the same
/// error, and no partial results are ever returned.
#[derive(Error, Debug)]
pub enum Error {
    /// Physically invalid material constants.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Material preset name not in the table.
    #[error("unknown material: {0:?}")]
    UnknownMaterial(String),

    /// Operator name outside the fixed dispatch set.
    #[error("unknown operator: {0:?}")]
    UnknownOperator(String),

    /// Element with zero or near-zero measure (collapsed or inverted).
    #[error("degenerate element {element}: measure {measure} is not positive")]
    DegenerateElement { element: usize, measure: f64 },

    /// The mesh lacks a required precomputed attribute.
    #[error("mesh is missing required attribute {0:?}")]
    MissingAttribute(&'static str),

    /// Material dimension does not match the mesh dimension.
    #[error("dimension mismatch: material is {material}D but mesh is {mesh}D")]
    DimensionMismatch { material: usize, mesh: usize },

    /// Malformed mesh input (connectivity, arity, attribute lengths).
    #[error("mesh error: {0}")]
    Mesh(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_attribute() {
        let err = Error::MissingAttribute("voxel_volume");
        assert!(err.to_string().contains("voxel_volume"));
    }

    #[test]
    fn display_reports_both_dimensions() {
        let err = Error::DimensionMismatch { material: 3, mesh: 2 };
        let msg = err.to_string();
        assert!(msg.contains("3D") && msg.contains("2D"));
    }
}

//! Named scalar fields attached to a mesh.

use crate::{Mesh, Vertex};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name of the vertex-centered elevation group derived from vertex Z values.
pub const BED_ELEVATION: &str = "Bed Elevation";

/// Mesh element a dataset value is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataLocation {
    /// One value per vertex.
    OnVertices,
    /// One value per face.
    OnFaces,
}

/// A named scalar field with one value per vertex or per face.
///
/// `NaN` marks elements without a value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DatasetGroup {
    /// Display name, e.g. `"Bed Elevation (Face)"`.
    pub name: String,
    /// Element kind the values belong to.
    pub location: DataLocation,
    /// Values indexed like the vertices or faces of the mesh.
    pub values: Vec<f64>,
}

impl DatasetGroup {
    /// Create a group.
    #[must_use]
    pub fn new(name: impl Into<String>, location: DataLocation, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            location,
            values,
        }
    }

    /// Rename the group.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Whether the group holds any defined value.
    #[must_use]
    pub fn has_values(&self) -> bool {
        self.values.iter().any(|v| !v.is_nan())
    }
}

/// Attach a face-centered scalar group.
///
/// Nothing is attached when `values` is empty or its length does not match the
/// face count of the mesh.
pub fn add_face_scalar_dataset_group(mesh: &mut Mesh, values: Vec<f64>, name: &str) {
    if values.is_empty() || values.len() != mesh.face_count() {
        return;
    }
    mesh.dataset_groups
        .push(DatasetGroup::new(name, DataLocation::OnFaces, values));
}

/// Attach a vertex-centered [`BED_ELEVATION`] group built from vertex Z values.
///
/// Nothing is attached for an empty vertex set.
pub fn add_bed_elevation_dataset_group(mesh: &mut Mesh, vertices: &[Vertex]) {
    if vertices.is_empty() {
        return;
    }
    let values = vertices.iter().map(Vertex::z).collect();
    mesh.dataset_groups.push(DatasetGroup::new(
        BED_ELEVATION,
        DataLocation::OnVertices,
        values,
    ));
}

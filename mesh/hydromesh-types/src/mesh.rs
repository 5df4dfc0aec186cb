//! The normalized in-memory mesh every decoder populates.

use crate::iter::{EdgeReader, FaceReader, VertexReader};
use crate::{Aabb, DatasetGroup, Edge, Face, Vertex, VertexIdMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A decoded mesh.
///
/// The mesh exclusively owns its vertices, edges, faces, extent and dataset
/// groups. Storage is allocated up front from pre-counted capacities and then
/// filled by index assignment.
///
/// Meshes read from formats with sparse vertex numbering also keep the
/// external-ID map produced while decoding, so that vertices can still be
/// addressed by their on-disk identifier. For every other mesh that map is
/// empty.
///
/// # Example
///
/// ```
/// use hydromesh_types::{Aabb, Face, Mesh, Vertex};
///
/// let mut mesh = Mesh::new("MEMORY", 3, 0, 1, 3, Aabb::empty(), "memory://tri");
/// mesh.vertices[0] = Vertex::from_coords(0.0, 0.0, 0.0);
/// mesh.vertices[1] = Vertex::from_coords(1.0, 0.0, 0.0);
/// mesh.vertices[2] = Vertex::from_coords(0.0, 1.0, 0.0);
/// mesh.faces[0] = Face::from_slice(&[0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// assert_eq!(mesh.vertex_index(2), 2);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mesh {
    /// Short name of the driver that produced the mesh.
    pub driver_name: String,
    /// Source the mesh was read from.
    pub uri: String,
    /// Vertex sequence; positions are dense indices.
    pub vertices: Vec<Vertex>,
    /// Line elements.
    pub edges: Vec<Edge>,
    /// Faces referencing `vertices` by dense index.
    pub faces: Vec<Face>,
    /// Largest vertex count a face of this format may have.
    pub max_vertices_per_face: usize,
    /// Bounding extent of the vertex set.
    pub extent: Aabb,
    /// Source coordinate reference system as WKT, when known.
    pub crs_wkt: Option<String>,
    /// Attached scalar fields.
    pub dataset_groups: Vec<DatasetGroup>,
    vertex_ids: VertexIdMap,
}

impl Mesh {
    /// Allocate a mesh with exactly the given element counts.
    ///
    /// Vertices start at the origin, edges at `0 -> 0` and faces empty.
    #[must_use]
    pub fn new(
        driver_name: impl Into<String>,
        vertex_count: usize,
        edge_count: usize,
        face_count: usize,
        max_vertices_per_face: usize,
        extent: Aabb,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            driver_name: driver_name.into(),
            uri: uri.into(),
            vertices: vec![Vertex::default(); vertex_count],
            edges: vec![Edge::default(); edge_count],
            faces: vec![Face::new(); face_count],
            max_vertices_per_face,
            extent,
            crs_wkt: None,
            dataset_groups: Vec::new(),
            vertex_ids: VertexIdMap::new(),
        }
    }

    /// Attach the external-ID map built while decoding.
    #[must_use]
    pub fn with_vertex_ids(mut self, vertex_ids: VertexIdMap) -> Self {
        self.vertex_ids = vertex_ids;
        self
    }

    /// External-ID map retained from decoding (empty when not needed).
    #[must_use]
    pub const fn vertex_ids(&self) -> &VertexIdMap {
        &self.vertex_ids
    }

    /// Resolve an external vertex ID to a dense index.
    ///
    /// IDs absent from the retained map are returned unchanged, i.e. assumed to
    /// be dense already.
    #[must_use]
    pub fn vertex_index(&self, vertex_id: usize) -> usize {
        self.vertex_ids.resolve(vertex_id)
    }

    /// Largest vertex identifier a caller may use to address this mesh.
    ///
    /// This is the larger of the last dense index and the largest external ID
    /// in the retained map, since sparse IDs can exceed the vertex count.
    /// `None` for a mesh with no vertex and no mapped ID.
    #[must_use]
    pub fn maximum_vertex_id(&self) -> Option<usize> {
        let max_index = self.vertices.len().checked_sub(1);
        match (max_index, self.vertex_ids.max_external_id()) {
            (Some(index), Some(id)) => Some(index.max(id)),
            (index, id) => index.or(id),
        }
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Set the source CRS from a WKT string. An empty string clears it.
    pub fn set_crs_wkt(&mut self, wkt: impl Into<String>) {
        let wkt = wkt.into();
        self.crs_wkt = if wkt.is_empty() { None } else { Some(wkt) };
    }

    /// Look up a dataset group by name.
    #[must_use]
    pub fn dataset_group(&self, name: &str) -> Option<&DatasetGroup> {
        self.dataset_groups.iter().find(|g| g.name == name)
    }

    /// Sequential reader over vertex coordinates.
    #[must_use]
    pub fn read_vertices(&self) -> VertexReader<'_> {
        VertexReader::new(&self.vertices)
    }

    /// Sequential reader over faces.
    #[must_use]
    pub fn read_faces(&self) -> FaceReader<'_> {
        FaceReader::new(&self.faces)
    }

    /// Sequential reader over edges.
    #[must_use]
    pub fn read_edges(&self) -> EdgeReader<'_> {
        EdgeReader::new(&self.edges)
    }
}

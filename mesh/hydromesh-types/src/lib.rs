//! Normalized mesh entity model for hydromesh.
//!
//! Every format decoder fills the same in-memory representation:
//!
//! - [`Mesh`] - owns vertices, edges, faces, extent, CRS and dataset groups
//! - [`Vertex`], [`Edge`], [`Face`] - geometry primitives addressed by dense index
//! - [`Aabb`] - bounding extent computed from the final vertex set
//! - [`VertexIdMap`] - external vertex ID to dense index translation
//! - [`DatasetGroup`] - named scalar fields on vertices or faces
//!
//! # Indices
//!
//! Files commonly number vertices from 1 and sometimes leave gaps. Decoders
//! resolve every such *external ID* to a 0-based *dense index* before the mesh
//! is handed out. References that cannot be resolved are kept as
//! out-of-range markers (see [`INVALID_INDEX`]) and reported as warnings by the
//! decoder.
//!
//! # Example
//!
//! ```
//! use hydromesh_types::{Aabb, Face, Mesh, Vertex};
//!
//! let vertices = vec![
//!     Vertex::from_coords(0.0, 0.0, 0.0),
//!     Vertex::from_coords(1.0, 0.0, 0.0),
//!     Vertex::from_coords(0.0, 1.0, 0.0),
//! ];
//! let extent = Aabb::from_vertices(&vertices);
//!
//! let mut mesh = Mesh::new("MEMORY", 3, 0, 1, 3, extent, "memory://triangle");
//! mesh.vertices = vertices;
//! mesh.faces[0] = Face::from_slice(&[0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert_eq!(mesh.extent.max.x, 1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod dataset;
mod iter;
mod mesh;
mod remap;
mod vertex;

pub use bounds::Aabb;
pub use dataset::{
    add_bed_elevation_dataset_group, add_face_scalar_dataset_group, DataLocation, DatasetGroup,
    BED_ELEVATION,
};
pub use iter::{EdgeReader, FaceReader, VertexReader};
pub use mesh::Mesh;
pub use remap::{Registration, VertexIdMap};
pub use vertex::{Edge, Face, Vertex, INVALID_INDEX};

pub use nalgebra::Point3;

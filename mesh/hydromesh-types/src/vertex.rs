//! Vertex, edge and face primitives.

use nalgebra::Point3;
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Marker stored in a face or edge slot whose vertex reference could not be
/// resolved to a dense index.
pub const INVALID_INDEX: usize = usize::MAX;

/// A mesh vertex.
///
/// Vertices carry no identifier of their own: once decoding completes a vertex
/// is addressed purely by its position in the mesh's vertex sequence.
///
/// # Example
///
/// ```
/// use hydromesh_types::{Vertex, Point3};
///
/// let v1 = Vertex::new(Point3::new(1.0, 2.0, 3.0));
/// let v2 = Vertex::from_coords(1.0, 2.0, 3.0);
///
/// assert_eq!(v1, v2);
/// assert_eq!(v2.z(), 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// 3D position.
    pub position: Point3<f64>,
}

impl Vertex {
    /// Create a vertex at the given position.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self { position }
    }

    /// Create a vertex from raw coordinates.
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// X coordinate.
    #[inline]
    #[must_use]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    /// Y coordinate.
    #[inline]
    #[must_use]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Z coordinate (elevation for terrain meshes).
    #[inline]
    #[must_use]
    pub fn z(&self) -> f64 {
        self.position.z
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new(Point3::origin())
    }
}

impl From<[f64; 3]> for Vertex {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::from_coords(x, y, z)
    }
}

impl From<(f64, f64, f64)> for Vertex {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::from_coords(x, y, z)
    }
}

/// A line element joining two vertices by dense index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    /// Dense index of the first vertex.
    pub start_vertex: usize,
    /// Dense index of the second vertex.
    pub end_vertex: usize,
}

impl Edge {
    /// Create an edge between two dense vertex indices.
    #[inline]
    #[must_use]
    pub const fn new(start_vertex: usize, end_vertex: usize) -> Self {
        Self {
            start_vertex,
            end_vertex,
        }
    }
}

/// A face as an ordered list of dense vertex indices.
///
/// Decoders only ever produce triangles and quads, so four slots are kept
/// inline.
pub type Face = SmallVec<[usize; 4]>;

//! Sequential batch readers over a mesh's elements.
//!
//! These are the read surface handed to consumers that copy geometry into
//! their own flat buffers. Every `next` call fills as much of the caller's
//! buffers as fits and returns the number of elements written; `0` means the
//! reader is exhausted (or the buffers are too small for the next element).

use crate::{Edge, Face, Vertex};

/// Reads vertices as `x, y, z` triples.
#[derive(Debug, Clone)]
pub struct VertexReader<'a> {
    vertices: &'a [Vertex],
    position: usize,
}

impl<'a> VertexReader<'a> {
    pub(crate) const fn new(vertices: &'a [Vertex]) -> Self {
        Self {
            vertices,
            position: 0,
        }
    }

    /// Copy up to `count` vertices into `coordinates`, three values each.
    ///
    /// # Example
    ///
    /// ```
    /// use hydromesh_types::{Aabb, Mesh, Vertex};
    ///
    /// let mut mesh = Mesh::new("MEMORY", 2, 0, 0, 3, Aabb::empty(), "memory://");
    /// mesh.vertices[1] = Vertex::from_coords(4.0, 5.0, 6.0);
    ///
    /// let mut reader = mesh.read_vertices();
    /// let mut buf = [0.0; 6];
    /// assert_eq!(reader.next(2, &mut buf), 2);
    /// assert_eq!(buf, [0.0, 0.0, 0.0, 4.0, 5.0, 6.0]);
    /// assert_eq!(reader.next(2, &mut buf), 0);
    /// ```
    pub fn next(&mut self, count: usize, coordinates: &mut [f64]) -> usize {
        let remaining = &self.vertices[self.position..];
        let n = count.min(coordinates.len() / 3).min(remaining.len());
        for (vertex, out) in remaining[..n].iter().zip(coordinates.chunks_exact_mut(3)) {
            out[0] = vertex.x();
            out[1] = vertex.y();
            out[2] = vertex.z();
        }
        self.position += n;
        n
    }
}

/// Reads faces as a flat index list plus cumulative offsets.
#[derive(Debug, Clone)]
pub struct FaceReader<'a> {
    faces: &'a [Face],
    position: usize,
}

impl<'a> FaceReader<'a> {
    pub(crate) const fn new(faces: &'a [Face]) -> Self {
        Self { faces, position: 0 }
    }

    /// Copy faces until either buffer is full.
    ///
    /// `face_offsets[i]` receives the end position in `vertex_indices` of the
    /// `i`-th face written by this call, so the first offset is also the
    /// vertex count of the first face.
    ///
    /// # Example
    ///
    /// ```
    /// use hydromesh_types::{Aabb, Face, Mesh};
    ///
    /// let mut mesh = Mesh::new("MEMORY", 4, 0, 2, 4, Aabb::empty(), "memory://");
    /// mesh.faces[0] = Face::from_slice(&[0, 1, 2]);
    /// mesh.faces[1] = Face::from_slice(&[0, 1, 2, 3]);
    ///
    /// let mut reader = mesh.read_faces();
    /// let mut offsets = [0; 2];
    /// let mut indices = [0; 8];
    /// assert_eq!(reader.next(&mut offsets, &mut indices), 2);
    /// assert_eq!(offsets, [3, 7]);
    /// assert_eq!(&indices[..7], &[0, 1, 2, 0, 1, 2, 3]);
    /// ```
    pub fn next(&mut self, face_offsets: &mut [usize], vertex_indices: &mut [usize]) -> usize {
        let mut written_faces = 0;
        let mut written_indices = 0;

        while written_faces < face_offsets.len() {
            let Some(face) = self.faces.get(self.position) else {
                break;
            };
            let end = written_indices + face.len();
            if end > vertex_indices.len() {
                break;
            }
            vertex_indices[written_indices..end].copy_from_slice(face);
            written_indices = end;
            face_offsets[written_faces] = end;
            written_faces += 1;
            self.position += 1;
        }

        written_faces
    }
}

/// Reads edges as parallel start/end index lists.
#[derive(Debug, Clone)]
pub struct EdgeReader<'a> {
    edges: &'a [Edge],
    position: usize,
}

impl<'a> EdgeReader<'a> {
    pub(crate) const fn new(edges: &'a [Edge]) -> Self {
        Self { edges, position: 0 }
    }

    /// Copy edges until either buffer is full.
    pub fn next(&mut self, start_vertices: &mut [usize], end_vertices: &mut [usize]) -> usize {
        let remaining = &self.edges[self.position..];
        let n = start_vertices
            .len()
            .min(end_vertices.len())
            .min(remaining.len());
        for (i, edge) in remaining[..n].iter().enumerate() {
            start_vertices[i] = edge.start_vertex;
            end_vertices[i] = edge.end_vertex;
        }
        self.position += n;
        n
    }
}

#[cfg(test)]
mod tests {
    use crate::{Aabb, Edge, Face, Mesh, Vertex};

    fn sample() -> Mesh {
        let mut mesh = Mesh::new("T", 4, 2, 3, 4, Aabb::empty(), "x");
        for (i, v) in mesh.vertices.iter_mut().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let f = i as f64;
            *v = Vertex::from_coords(f, f + 0.5, -f);
        }
        mesh.faces[0] = Face::from_slice(&[0, 1, 2]);
        mesh.faces[1] = Face::from_slice(&[0, 1, 2, 3]);
        mesh.faces[2] = Face::from_slice(&[1, 2, 3]);
        mesh.edges[0] = Edge::new(0, 1);
        mesh.edges[1] = Edge::new(2, 3);
        mesh
    }

    #[test]
    fn vertex_reader_respects_buffer_size() {
        let mesh = sample();
        let mut reader = mesh.read_vertices();
        let mut buf = [0.0; 7];
        // Room for two vertices only
        assert_eq!(reader.next(10, &mut buf), 2);
        assert_eq!(reader.next(10, &mut buf), 2);
        assert!((buf[0] - 2.0).abs() < f64::EPSILON);
        assert_eq!(reader.next(10, &mut buf), 0);
    }

    #[test]
    fn face_reader_stops_when_indices_do_not_fit() {
        let mesh = sample();
        let mut reader = mesh.read_faces();
        let mut offsets = [0; 3];
        let mut indices = [0; 6];

        assert_eq!(reader.next(&mut offsets, &mut indices), 1);
        assert_eq!(offsets[0], 3);

        assert_eq!(reader.next(&mut offsets, &mut indices), 1);
        assert_eq!(offsets[0], 4);
        assert_eq!(&indices[..4], &[0, 1, 2, 3]);

        assert_eq!(reader.next(&mut offsets, &mut indices), 1);
        assert_eq!(reader.next(&mut offsets, &mut indices), 0);
    }

    #[test]
    fn edge_reader_returns_pairs() {
        let mesh = sample();
        let mut reader = mesh.read_edges();
        let mut starts = [0; 1];
        let mut ends = [0; 1];
        assert_eq!(reader.next(&mut starts, &mut ends), 1);
        assert_eq!((starts[0], ends[0]), (0, 1));
        assert_eq!(reader.next(&mut starts, &mut ends), 1);
        assert_eq!((starts[0], ends[0]), (2, 3));
        assert_eq!(reader.next(&mut starts, &mut ends), 0);
    }
}

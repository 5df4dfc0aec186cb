//! 2DM text mesh format support.
//!
//! 2DM is a line-oriented ASCII format written by hydraulic modelling
//! packages. The first line is the `MESH2D` header; every following line starts
//! with a tag:
//!
//! ```text
//! MESH2D
//! ND  id x y z                       vertex, id numbered from 1
//! E3T id n1 n2 n3 [matid [elev]]     triangle
//! E4Q id n1 n2 n3 n4 [matid [elev]]  quad
//! E2L id n1 n2 matid                 line element
//! ```
//!
//! The optional trailing `elev` of a face is the cell-centered bed elevation
//! written by BASEMENT 3.x. Elements with more nodes (`E3L`, `E6T`, `E8Q`,
//! `E9Q`) cannot be represented and abort the decode.
//!
//! # Decoding
//!
//! The file is scanned twice. The first pass counts elements so storage can be
//! allocated once; the second fills it. Vertex IDs may have gaps but must be
//! strictly increasing: a final pass translates face references through the
//! ID map built while reading vertices. Line element endpoints are stored as
//! 0-based file IDs without translation.
//!
//! # Example
//!
//! ```no_run
//! use hydromesh_io::{load_2dm, save_2dm};
//!
//! let loaded = load_2dm("channel.2dm").unwrap();
//! for warning in loaded.warnings() {
//!     eprintln!("{warning}");
//! }
//! save_2dm(&loaded.mesh, "channel_copy.2dm").unwrap();
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;
use std::str::FromStr;

use hydromesh_types::{
    add_bed_elevation_dataset_group, add_face_scalar_dataset_group, Aabb, Edge, Face, Mesh,
    Registration, Vertex, VertexIdMap, INVALID_INDEX,
};
use tracing::{debug, info};

use crate::config::TextMeshConfig;
use crate::diagnostics::{Diagnostics, LoadedMesh};
use crate::driver::{Capability, Driver};
use crate::error::{IoError, IoResult, Status};

const DRIVER_NAME: &str = "2DM";

/// First token of every 2DM file.
const HEADER: &str = "MESH2D";

/// Element tags with more nodes than the mesh model supports.
const UNSUPPORTED_TAGS: [&str; 4] = ["E3L", "E6T", "E8Q", "E9Q"];

/// Largest face a 2DM file may contain.
pub const MAX_VERTICES_PER_FACE_2DM: usize = 4;

/// Name of the face-centered elevation group read from BASEMENT 3.x files.
pub const FACE_ELEVATION: &str = "Bed Elevation (Face)";

/// Driver for 2DM files.
#[derive(Debug, Clone, Default)]
pub struct Driver2dm {
    config: TextMeshConfig,
}

impl Driver2dm {
    /// Create a driver with the default encoder settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a driver with custom encoder settings.
    #[must_use]
    pub const fn with_config(config: TextMeshConfig) -> Self {
        Self { config }
    }

    /// Encoder settings.
    #[must_use]
    pub const fn config(&self) -> &TextMeshConfig {
        &self.config
    }
}

impl Driver for Driver2dm {
    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    fn long_name(&self) -> &'static str {
        "2DM Mesh File"
    }

    fn filters(&self) -> &'static str {
        "*.2dm"
    }

    fn capabilities(&self) -> Capability {
        Capability::READ_MESH | Capability::SAVE_MESH
    }

    fn can_read(&self, path: &Path) -> bool {
        let Ok(file) = File::open(path) else {
            return false;
        };
        let mut first_line = String::new();
        match BufReader::new(file).read_line(&mut first_line) {
            Ok(_) => first_line.starts_with(HEADER),
            Err(_) => false,
        }
    }

    fn load(&self, path: &Path) -> IoResult<LoadedMesh> {
        let file = File::open(path).map_err(|_| {
            IoError::unknown_format(format!("{} could not be opened", path.display()))
        })?;
        read_2dm(BufReader::new(file), &path.to_string_lossy())
    }

    fn save(&self, path: &Path, mesh: &Mesh) -> IoResult<()> {
        let file = File::create(path).map_err(|_| IoError::FailToWriteToDisk {
            path: path.to_path_buf(),
        })?;
        let mut writer = BufWriter::new(file);
        write_2dm(mesh, &mut writer, &self.config)?;
        writer.flush()?;
        Ok(())
    }
}

/// Load a 2DM file.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened or lacks the `MESH2D` header (`UnknownFormat`)
/// - It contains an element type with more than four nodes (`UnsupportedElement`)
/// - Vertex IDs are not strictly increasing, or a line is malformed (`InvalidData`)
pub fn load_2dm<P: AsRef<Path>>(path: P) -> IoResult<LoadedMesh> {
    Driver2dm::new().load(path.as_ref())
}

/// Save a mesh as 2DM using the default precision settings.
///
/// # Errors
///
/// Returns `FailToWriteToDisk` if the output file cannot be created, or an I/O
/// error if writing fails.
pub fn save_2dm<P: AsRef<Path>>(mesh: &Mesh, path: P) -> IoResult<()> {
    Driver2dm::new().save(path.as_ref(), mesh)
}

/// What a line of a 2DM file describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    Vertex,
    Face(usize),
    Edge,
    Unsupported(&'a str),
    Other,
}

fn classify<'a>(tokens: &[&'a str]) -> LineKind<'a> {
    match tokens.first().copied() {
        Some("ND") => LineKind::Vertex,
        Some("E3T") => LineKind::Face(3),
        Some("E4Q") => LineKind::Face(4),
        Some("E2L") => LineKind::Edge,
        Some(tag) if UNSUPPORTED_TAGS.contains(&tag) => LineKind::Unsupported(tag),
        _ => LineKind::Other,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ElementCounts {
    vertices: usize,
    edges: usize,
    faces: usize,
}

/// Decode a 2DM stream.
///
/// The stream is rewound for the second pass, hence the `Seek` bound.
///
/// # Errors
///
/// See [`load_2dm`].
pub fn read_2dm<R: BufRead + Seek>(mut reader: R, uri: &str) -> IoResult<LoadedMesh> {
    let mut diagnostics = Diagnostics::new(DRIVER_NAME);

    let counts = count_elements(&mut reader, uri)?;
    debug!(
        vertices = counts.vertices,
        faces = counts.faces,
        edges = counts.edges,
        "Counted 2DM elements"
    );

    reader.seek(SeekFrom::Start(0))?;
    let mut elements = read_elements(reader, counts, &mut diagnostics)?;
    resolve_face_vertices(&mut elements, &mut diagnostics);

    let ElementsRead {
        vertices,
        edges,
        faces,
        vertex_ids,
        face_elevation,
    } = elements;

    let mut mesh = Mesh::new(
        DRIVER_NAME,
        vertices.len(),
        edges.len(),
        faces.len(),
        MAX_VERTICES_PER_FACE_2DM,
        Aabb::from_vertices(&vertices),
        uri,
    )
    .with_vertex_ids(vertex_ids);
    mesh.faces = faces;
    mesh.edges = edges;

    add_face_scalar_dataset_group(&mut mesh, face_elevation, FACE_ELEVATION);
    add_bed_elevation_dataset_group(&mut mesh, &vertices);
    mesh.vertices = vertices;

    info!(
        uri,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        edges = mesh.edge_count(),
        warnings = diagnostics.warning_count(),
        "Loaded 2DM mesh"
    );

    Ok(LoadedMesh::new(mesh, diagnostics))
}

/// First pass: validate the header and count elements.
fn count_elements<R: BufRead>(reader: &mut R, uri: &str) -> IoResult<ElementCounts> {
    let mut lines = reader.lines();
    match lines.next() {
        Some(Ok(header)) if header.starts_with(HEADER) => {}
        Some(Err(e)) => return Err(e.into()),
        _ => {
            return Err(IoError::unknown_format(format!(
                "{uri} does not start with {HEADER}"
            )))
        }
    }

    let mut counts = ElementCounts::default();
    for (offset, line) in lines.enumerate() {
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match classify(&tokens) {
            LineKind::Vertex => counts.vertices += 1,
            LineKind::Face(_) => counts.faces += 1,
            LineKind::Edge => counts.edges += 1,
            LineKind::Unsupported(tag) => {
                return Err(IoError::UnsupportedElement {
                    tag: tag.to_string(),
                    line: offset + 2,
                });
            }
            LineKind::Other => {}
        }
    }
    Ok(counts)
}

/// Everything collected by the second pass.
struct ElementsRead {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    /// Holds 0-based external IDs until [`resolve_face_vertices`] runs.
    faces: Vec<Face>,
    vertex_ids: VertexIdMap,
    /// Empty unless at least one face carries an elevation.
    face_elevation: Vec<f64>,
}

/// Second pass: populate pre-sized storage.
fn read_elements<R: BufRead>(
    reader: R,
    counts: ElementCounts,
    diagnostics: &mut Diagnostics,
) -> IoResult<ElementsRead> {
    let mut read = ElementsRead {
        vertices: Vec::with_capacity(counts.vertices),
        edges: Vec::with_capacity(counts.edges),
        faces: Vec::with_capacity(counts.faces),
        vertex_ids: VertexIdMap::new(),
        face_elevation: Vec::new(),
    };
    let mut last_vertex_id = 0usize;

    for (offset, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = offset + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match classify(&tokens) {
            LineKind::Vertex => {
                require_tokens(&tokens, 5, line_no)?;
                let vertex_id: usize = parse_token(&tokens, 1, line_no)?;

                // ID 0 is "unset" and takes no part in the ordering check
                if vertex_id != 0 {
                    if last_vertex_id != 0 && vertex_id <= last_vertex_id {
                        return Err(IoError::invalid_data(format!(
                            "line {line_no}: nodes are not ordered by index ({vertex_id} after {last_vertex_id})"
                        )));
                    }
                    last_vertex_id = vertex_id;

                    let dense_index = read.vertices.len();
                    if let Registration::Duplicate { existing } =
                        read.vertex_ids.register(dense_index, vertex_id - 1)
                    {
                        diagnostics.warning(
                            Status::WarnElementNotUnique,
                            format!(
                                "line {line_no}: vertex ID {vertex_id} already used by vertex {existing}"
                            ),
                        );
                    }
                }

                read.vertices.push(Vertex::from_coords(
                    parse_token(&tokens, 2, line_no)?,
                    parse_token(&tokens, 3, line_no)?,
                    parse_token(&tokens, 4, line_no)?,
                ));
            }
            LineKind::Face(vertex_count) => {
                require_tokens(&tokens, vertex_count + 2, line_no)?;
                let mut face = Face::with_capacity(vertex_count);
                for i in 0..vertex_count {
                    face.push(zero_based(parse_token(&tokens, i + 2, line_no)?));
                }

                // tag, id, vertices, material, elevation
                if tokens.len() == vertex_count + 4 {
                    if read.face_elevation.is_empty() {
                        read.face_elevation = vec![f64::NAN; counts.faces];
                    }
                    let face_index = read.faces.len();
                    read.face_elevation[face_index] =
                        parse_token(&tokens, vertex_count + 3, line_no)?;
                }

                read.faces.push(face);
            }
            LineKind::Edge => {
                require_tokens(&tokens, 4, line_no)?;
                read.edges.push(Edge::new(
                    zero_based(parse_token(&tokens, 2, line_no)?),
                    zero_based(parse_token(&tokens, 3, line_no)?),
                ));
            }
            LineKind::Unsupported(tag) => {
                // The file changed between passes
                return Err(IoError::UnsupportedElement {
                    tag: tag.to_string(),
                    line: line_no,
                });
            }
            LineKind::Other => {}
        }
    }

    if read.vertices.len() != counts.vertices
        || read.faces.len() != counts.faces
        || read.edges.len() != counts.edges
    {
        return Err(IoError::invalid_data(
            "element counts changed between passes",
        ));
    }

    debug!(
        remapped_ids = read.vertex_ids.len(),
        face_elevation = !read.face_elevation.is_empty(),
        "Read 2DM elements"
    );
    Ok(read)
}

/// Third pass: translate face references from external IDs to dense indices.
///
/// References with no map entry are assumed dense already. Those beyond the
/// vertex count are left in place and reported.
fn resolve_face_vertices(read: &mut ElementsRead, diagnostics: &mut Diagnostics) {
    let vertex_count = read.vertices.len();
    for (face_index, face) in read.faces.iter_mut().enumerate() {
        for slot in face.iter_mut() {
            let vertex_id = *slot;
            if let Some(index) = read.vertex_ids.get(vertex_id) {
                *slot = index;
            } else if vertex_id >= vertex_count {
                diagnostics.warning(
                    Status::WarnElementWithInvalidNode,
                    format!(
                        "face {} references missing vertex {}",
                        face_index + 1,
                        display_id(vertex_id)
                    ),
                );
            }
        }
    }
}

/// 1-based file ID to 0-based ID; `0` has no 0-based counterpart.
const fn zero_based(id: usize) -> usize {
    match id.checked_sub(1) {
        Some(id) => id,
        None => INVALID_INDEX,
    }
}

/// 0-based index back to its 1-based file form; unresolved markers become `0`.
fn display_id(index: usize) -> usize {
    if index == INVALID_INDEX {
        0
    } else {
        index + 1
    }
}

fn require_tokens(tokens: &[&str], minimum: usize, line_no: usize) -> IoResult<()> {
    if tokens.len() < minimum {
        return Err(IoError::invalid_data(format!(
            "line {line_no}: `{}` needs at least {minimum} fields, found {}",
            tokens.first().copied().unwrap_or_default(),
            tokens.len()
        )));
    }
    Ok(())
}

fn parse_token<T: FromStr>(tokens: &[&str], index: usize, line_no: usize) -> IoResult<T> {
    let token = tokens.get(index).copied().unwrap_or_default();
    token.parse().map_err(|_| {
        IoError::invalid_data(format!(
            "line {line_no}: cannot parse field {} `{token}`",
            index + 1
        ))
    })
}

/// Encode a mesh as 2DM.
///
/// Vertices and faces are numbered by their row, so external IDs of the source
/// file are not preserved. Faces that are neither triangles nor quads are
/// skipped. Line elements get material ID `1`.
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn write_2dm<W: Write>(mesh: &Mesh, writer: &mut W, config: &TextMeshConfig) -> IoResult<()> {
    writeln!(writer, "{HEADER}")?;

    let mut vertices = mesh.read_vertices();
    let mut coordinates = [0.0; 3];
    let mut row = 0;
    while vertices.next(1, &mut coordinates) == 1 {
        row += 1;
        writeln!(
            writer,
            "ND {row} {} {} {}",
            format_coordinate(coordinates[0], config.coordinate_precision),
            format_coordinate(coordinates[1], config.coordinate_precision),
            format_fixed(coordinates[2], config.elevation_precision),
        )?;
    }

    let widest = mesh.faces.iter().map(Face::len).max().unwrap_or(0);
    let mut faces = mesh.read_faces();
    let mut offsets = [0usize; 1];
    let mut indices = vec![0usize; widest];
    let mut row = 0;
    let mut skipped = 0usize;
    while faces.next(&mut offsets, &mut indices) == 1 {
        row += 1;
        let tag = match offsets[0] {
            3 => "E3T",
            4 => "E4Q",
            _ => {
                skipped += 1;
                continue;
            }
        };
        write!(writer, "{tag} {row}")?;
        for &index in &indices[..offsets[0]] {
            write!(writer, " {}", display_id(index))?;
        }
        writeln!(writer)?;
    }

    let mut edges = mesh.read_edges();
    let mut starts = [0usize; 1];
    let mut ends = [0usize; 1];
    let mut row = mesh.face_count();
    while edges.next(&mut starts, &mut ends) == 1 {
        row += 1;
        writeln!(
            writer,
            "E2L {row} {} {} 1",
            display_id(starts[0]),
            display_id(ends[0])
        )?;
    }

    debug!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count() - skipped,
        skipped_faces = skipped,
        edges = mesh.edge_count(),
        "Wrote 2DM mesh"
    );
    Ok(())
}

/// Format an X/Y coordinate.
///
/// Values up to 180 in magnitude may be degrees and get six extra digits.
fn format_coordinate(value: f64, precision: usize) -> String {
    let digits = if value.abs() > 180.0 {
        precision
    } else {
        precision + 6
    };
    format_fixed(value, digits)
}

/// Fixed-point formatting with trailing zeros removed.
fn format_fixed(value: f64, digits: usize) -> String {
    let text = format!("{value:.digits$}");
    let trimmed = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text.as_str()
    };
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use hydromesh_types::{DataLocation, BED_ELEVATION};
    use std::io::Cursor;

    fn decode(text: &str) -> IoResult<LoadedMesh> {
        read_2dm(Cursor::new(text.as_bytes().to_vec()), "memory://test.2dm")
    }

    #[test]
    fn single_triangle() {
        let loaded =
            decode("MESH2D\nND 1 0 0 0\nND 2 1 0 0\nND 3 0 1 0\nE3T 1 1 2 3 1\n").unwrap();
        let mesh = &loaded.mesh;

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.edge_count(), 0);
        assert_eq!(mesh.faces[0].as_slice(), &[0, 1, 2]);
        assert_eq!(mesh.extent.min.x, 0.0);
        assert_eq!(mesh.extent.max.x, 1.0);
        assert_eq!(mesh.extent.min.y, 0.0);
        assert_eq!(mesh.extent.max.y, 1.0);
        assert_eq!(mesh.max_vertices_per_face, MAX_VERTICES_PER_FACE_2DM);
        assert_eq!(loaded.status(), Status::None);
        assert!(mesh.vertex_ids().is_empty());
    }

    #[test]
    fn missing_header_is_unknown_format() {
        let err = decode("ND 1 0 0 0\n").unwrap_err();
        assert_eq!(err.status(), Status::ErrUnknownFormat);

        let err = decode("").unwrap_err();
        assert_eq!(err.status(), Status::ErrUnknownFormat);
    }

    #[test]
    fn repeated_vertex_id_is_invalid_data() {
        let err = decode("MESH2D\nND 1 0 0 0\nND 1 1 0 0\n").unwrap_err();
        assert_eq!(err.status(), Status::ErrInvalidData);
        assert!(err.to_string().contains("not ordered"));
    }

    #[test]
    fn decreasing_vertex_id_is_invalid_data() {
        let err = decode("MESH2D\nND 5 0 0 0\nND 2 1 0 0\n").unwrap_err();
        assert_eq!(err.status(), Status::ErrInvalidData);
    }

    #[test]
    fn gapped_ids_are_remapped() {
        let loaded = decode(
            "MESH2D\nND 1 0 0 0\nND 3 1 0 0\nND 5 0 1 0\nE3T 1 1 3 5 1\n",
        )
        .unwrap();
        let mesh = &loaded.mesh;
        let ids = mesh.vertex_ids();

        assert_eq!(ids.len(), 2);
        assert_eq!(ids.get(0), None);
        assert_eq!(ids.get(2), Some(1));
        assert_eq!(ids.get(4), Some(2));
        assert_eq!(mesh.faces[0].as_slice(), &[0, 1, 2]);
        assert_eq!(mesh.vertex_index(4), 2);
        assert_eq!(mesh.maximum_vertex_id(), Some(4));
        assert_eq!(loaded.status(), Status::None);
    }

    #[test]
    fn unsupported_element_aborts_regardless_of_position() {
        let text = "MESH2D\nND 1 0 0 0\nND 2 1 0 0\nND 3 0 1 0\nE3T 1 1 2 3 1\nE6T 2 1 2 3 1 2 3 1\n";
        let err = decode(text).unwrap_err();
        assert_eq!(err.status(), Status::ErrUnsupportedElement);
        assert!(matches!(
            err,
            IoError::UnsupportedElement { ref tag, line: 6 } if tag == "E6T"
        ));

        for tag in UNSUPPORTED_TAGS {
            let err = decode(&format!("MESH2D\n{tag} 1 1 2 3\n")).unwrap_err();
            assert_eq!(err.status(), Status::ErrUnsupportedElement);
        }
    }

    #[test]
    fn quads_and_edges() {
        let text = "MESH2D\n\
            ND 1 0 0 1\nND 2 1 0 2\nND 3 1 1 3\nND 4 0 1 4\n\
            E4Q 1 1 2 3 4 1\n\
            E2L 2 1 3 1\n";
        let loaded = decode(text).unwrap();
        let mesh = &loaded.mesh;

        assert_eq!(mesh.faces[0].as_slice(), &[0, 1, 2, 3]);
        assert_eq!(mesh.edges, vec![Edge::new(0, 2)]);

        let bed = mesh.dataset_group(BED_ELEVATION).unwrap();
        assert_eq!(bed.location, DataLocation::OnVertices);
        assert_eq!(bed.values, vec![1.0, 2.0, 3.0, 4.0]);
        assert!(mesh.dataset_group(FACE_ELEVATION).is_none());
    }

    #[test]
    fn face_elevation_is_read_when_present() {
        let text = "MESH2D\n\
            ND 1 0 0 0\nND 2 1 0 0\nND 3 0 1 0\nND 4 1 1 0\n\
            E3T 1 1 2 3 1\n\
            E3T 2 2 4 3 1 7.5\n";
        let loaded = decode(text).unwrap();
        let group = loaded.mesh.dataset_group(FACE_ELEVATION).unwrap();

        assert_eq!(group.location, DataLocation::OnFaces);
        assert_eq!(group.values.len(), 2);
        assert!(group.values[0].is_nan());
        assert_eq!(group.values[1], 7.5);
    }

    #[test]
    fn invalid_face_reference_is_a_warning() {
        let text = "MESH2D\nND 1 0 0 0\nND 2 1 0 0\nND 3 0 1 0\nE3T 1 1 2 9 1\n";
        let loaded = decode(text).unwrap();

        assert_eq!(loaded.status(), Status::WarnElementWithInvalidNode);
        // Left unresolved as an out-of-range index
        assert_eq!(loaded.mesh.faces[0].as_slice(), &[0, 1, 8]);
    }

    #[test]
    fn reference_to_vertex_count_is_invalid() {
        // 0-based reference 3 is one past the last vertex
        let text = "MESH2D\nND 1 0 0 0\nND 2 1 0 0\nND 3 0 1 0\nE3T 1 1 2 4 1\n";
        let loaded = decode(text).unwrap();
        assert_eq!(loaded.warnings().count(), 1);
    }

    #[test]
    fn zero_reference_becomes_invalid_marker() {
        let text = "MESH2D\nND 1 0 0 0\nND 2 1 0 0\nND 3 0 1 0\nE3T 1 0 2 3 1\n";
        let loaded = decode(text).unwrap();
        assert_eq!(loaded.mesh.faces[0][0], INVALID_INDEX);
        assert_eq!(loaded.status(), Status::WarnElementWithInvalidNode);
    }

    #[test]
    fn unmapped_reference_falls_back_to_raw_index() {
        // IDs 1, 2, 10: ID 10 is remapped, but a face naming ID 3 finds no
        // entry and silently resolves to vertex 2 (which is really ID 10).
        let text = "MESH2D\nND 1 0 0 0\nND 2 1 0 0\nND 10 0 1 0\nE3T 1 1 2 3 1\n";
        let loaded = decode(text).unwrap();
        assert_eq!(loaded.mesh.faces[0].as_slice(), &[0, 1, 2]);
        assert_eq!(loaded.status(), Status::None);
    }

    #[test]
    fn zero_vertex_id_skips_ordering_and_map() {
        let text = "MESH2D\nND 0 0 0 0\nND 0 1 0 0\nND 3 0 1 0\n";
        let loaded = decode(text).unwrap();
        assert_eq!(loaded.mesh.vertex_count(), 3);
        assert_eq!(loaded.mesh.vertex_ids().get(2), None);
    }

    #[test]
    fn malformed_vertex_line_is_invalid_data() {
        let err = decode("MESH2D\nND 1 0 0\n").unwrap_err();
        assert_eq!(err.status(), Status::ErrInvalidData);

        let err = decode("MESH2D\nND 1 0 zero 0\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn classify_by_first_token() {
        assert_eq!(classify(&["ND", "1", "0", "0", "0"]), LineKind::Vertex);
        assert_eq!(classify(&["E3T", "1"]), LineKind::Face(3));
        assert_eq!(classify(&["E4Q", "1"]), LineKind::Face(4));
        assert_eq!(classify(&["E2L", "1"]), LineKind::Edge);
        assert_eq!(classify(&["E9Q", "1"]), LineKind::Unsupported("E9Q"));
        assert_eq!(classify(&["MESHNAME"]), LineKind::Other);
        assert_eq!(classify(&[]), LineKind::Other);
    }

    #[test]
    fn unknown_lines_are_ignored() {
        let text = "MESH2D\nMESHNAME \"river\"\nND 1 0 0 0\nNS 1 2 -3\nBEGPARAMDEF\n";
        let loaded = decode(text).unwrap();
        assert_eq!(loaded.mesh.vertex_count(), 1);
    }

    #[test]
    fn crlf_line_endings() {
        let loaded =
            decode("MESH2D\r\nND 1 0 0 0\r\nND 2 1 0 0\r\nND 3 0 1 0\r\nE3T 1 1 2 3 1\r\n")
                .unwrap();
        assert_eq!(loaded.mesh.face_count(), 1);
    }

    #[test]
    fn write_numbers_rows_and_trims_zeros() {
        let text = "MESH2D\n\
            ND 1 500000.126 4000000 12.5\nND 5 500001 4000000 13\nND 9 500001 4000001 14\n\
            E3T 1 1 5 9 1\nE2L 2 1 5 1\n";
        let loaded = decode(text).unwrap();

        let mut out = Vec::new();
        write_2dm(&loaded.mesh, &mut out, &TextMeshConfig::default()).unwrap();
        let written = String::from_utf8(out).unwrap();

        // Line elements keep their file IDs
        assert_eq!(
            written,
            "MESH2D\n\
             ND 1 500000.13 4000000 12.5\n\
             ND 2 500001 4000000 13\n\
             ND 3 500001 4000001 14\n\
             E3T 1 1 2 3\n\
             E2L 2 1 5 1\n"
        );
    }

    #[test]
    fn write_skips_unsupported_faces() {
        let mut mesh = Mesh::new("MEMORY", 5, 0, 2, 5, Aabb::empty(), "x");
        mesh.faces[0] = Face::from_slice(&[0, 1, 2, 3, 4]);
        mesh.faces[1] = Face::from_slice(&[0, 1, 2]);

        let mut out = Vec::new();
        write_2dm(&mesh, &mut out, &TextMeshConfig::default()).unwrap();
        let written = String::from_utf8(out).unwrap();

        assert!(!written.contains("E5"));
        assert!(written.contains("E3T 2 1 2 3\n"));
    }

    #[test]
    fn geographic_coordinates_keep_more_digits() {
        assert_eq!(format_coordinate(12.123_456_789, 2), "12.12345679");
        assert_eq!(format_coordinate(1234.5678, 2), "1234.57");
        assert_eq!(format_fixed(-0.000_000_1, 2), "0");
        assert_eq!(format_fixed(3.0, 6), "3");
    }

    #[test]
    fn negative_zero_without_decimals() {
        assert_eq!(format_fixed(-0.4, 0), "0");
        assert_eq!(format_fixed(-0.6, 0), "-1");
        assert_eq!(format_coordinate(-200.4, 0), "-200");
    }

    #[test]
    fn decode_save_decode_preserves_topology() {
        let text = "MESH2D\n\
            ND 2 0 0 1\nND 4 10 0 2\nND 6 10 10 3\nND 8 0 10 4\n\
            E4Q 1 2 4 6 8 1\nE3T 2 2 4 8 1\nE2L 3 2 6 1\n";
        let first = decode(text).unwrap().mesh;

        let mut out = Vec::new();
        write_2dm(&first, &mut out, &TextMeshConfig::default()).unwrap();
        let second = read_2dm(Cursor::new(out), "memory://copy.2dm").unwrap().mesh;

        assert_eq!(first.vertices, second.vertices);
        assert_eq!(first.faces, second.faces);
        assert_eq!(first.edges, second.edges);
        // Rows were re-emitted, so the copy needs no ID map
        assert!(!first.vertex_ids().is_empty());
        assert!(second.vertex_ids().is_empty());
    }
}

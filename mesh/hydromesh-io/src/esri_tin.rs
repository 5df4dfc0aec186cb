//! Esri TIN dataset support.
//!
//! An Esri TIN is a directory of binary companion files, any of which may be
//! passed as the dataset URI:
//!
//! | File | Contents |
//! |------|----------|
//! | `tdenv.adf` / `tdenv9.adf` | total raw vertex count (first `i32`) |
//! | `tnod.adf` | face vertex triples, 1-based `i32` |
//! | `tmsk.adf` | face mask bit array |
//! | `tmsx.adf` | offset of the mask data in `tmsk.adf` |
//! | `tnxy.adf` | vertex X/Y as `f64` pairs |
//! | `tnz.adf` | vertex Z as `f32` |
//! | `thul.adf` | hull (superpoint) indices, `-1` terminated |
//! | `prj.adf` | coordinate reference system, first line |
//!
//! The raw vertex list contains superpoints and isolated vertices that no
//! visible face references. Decoding drops them and renumbers the rest:
//!
//! 1. Read faces with their mask bits, keep unmasked faces and flag the raw
//!    vertices they reference.
//! 2. Give flagged raw vertices consecutive corrected indices.
//! 3. Read coordinates, storing only flagged vertices.
//! 4. Translate face references to corrected indices.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use hydromesh_types::{
    add_bed_elevation_dataset_group, Aabb, Face, Mesh, Vertex, INVALID_INDEX,
};
use tracing::{debug, info};

use crate::config::{ByteOrder, TinConfig};
use crate::diagnostics::{Diagnostics, LoadedMesh};
use crate::driver::{Capability, Driver};
use crate::error::{IoError, IoResult};

const DRIVER_NAME: &str = "ESRI_TIN";

/// Every TIN face is a triangle.
pub const MAX_VERTICES_PER_FACE_TIN: usize = 3;

/// Name given to the vertex elevation group of a TIN.
pub const ALTITUDE: &str = "Altitude";

/// Class ID Esri writes to `prj.adf` for an unknown coordinate system.
const UNKNOWN_CRS: &str = "{B286C06B-0879-11D2-AACA-00C04FA33C20}";

/// Mask metadata is big-endian whatever the data files use.
const MASK_ORDER: ByteOrder = ByteOrder::Big;

/// Paths of the companion files of a TIN dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TinFiles {
    /// Vertex X/Y.
    pub xy: PathBuf,
    /// Vertex Z.
    pub z: PathBuf,
    /// Face vertex triples.
    pub faces: PathBuf,
    /// Face mask bits.
    pub mask: PathBuf,
    /// Mask data offset.
    pub mask_index: PathBuf,
    /// Hull indices.
    pub hull: PathBuf,
    /// Vertex count.
    pub denv: PathBuf,
    /// Vertex count, alternative name.
    pub denv9: PathBuf,
    /// Coordinate reference system.
    pub crs: PathBuf,
}

impl TinFiles {
    /// Resolve the companion files next to `uri`.
    #[must_use]
    pub fn new(uri: &Path) -> Self {
        let dir = uri.parent().unwrap_or_else(|| Path::new(""));
        Self {
            xy: dir.join("tnxy.adf"),
            z: dir.join("tnz.adf"),
            faces: dir.join("tnod.adf"),
            mask: dir.join("tmsk.adf"),
            mask_index: dir.join("tmsx.adf"),
            hull: dir.join("thul.adf"),
            denv: dir.join("tdenv.adf"),
            denv9: dir.join("tdenv9.adf"),
            crs: dir.join("prj.adf"),
        }
    }
}

/// Driver for Esri TIN datasets.
///
/// Read only: [`Driver::save`] fails with `MissingDriverCapability`.
#[derive(Debug, Clone, Default)]
pub struct DriverEsriTin {
    config: TinConfig,
}

impl DriverEsriTin {
    /// Create a driver reading big-endian data files.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a driver with custom settings.
    #[must_use]
    pub const fn with_config(config: TinConfig) -> Self {
        Self { config }
    }

    /// Decoder settings.
    #[must_use]
    pub const fn config(&self) -> &TinConfig {
        &self.config
    }

    /// Raw indices of the hull superpoints, sorted ascending.
    ///
    /// Reading stops at the `-1` terminator or the end of the file.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if `thul.adf` cannot be opened.
    pub fn read_superpoints(&self, uri: &Path) -> IoResult<Vec<i32>> {
        let path = TinFiles::new(uri).hull;
        let mut reader = open_required(&path)?;
        let mut indices = Vec::new();
        while let Some(index) = self.config.byte_order.read_i32(&mut reader)? {
            if index == -1 {
                break;
            }
            indices.push(index);
        }
        indices.sort_unstable();
        Ok(indices)
    }
}

impl Driver for DriverEsriTin {
    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    fn long_name(&self) -> &'static str {
        "Esri TIN"
    }

    fn filters(&self) -> &'static str {
        "*.adf"
    }

    fn capabilities(&self) -> Capability {
        Capability::READ_MESH
    }

    fn can_read(&self, path: &Path) -> bool {
        let files = TinFiles::new(path);
        [&files.xy, &files.z, &files.faces, &files.hull]
            .iter()
            .all(|p| File::open(p).is_ok())
    }

    fn load(&self, path: &Path) -> IoResult<LoadedMesh> {
        let files = TinFiles::new(path);
        let order = self.config.byte_order;
        let mut diagnostics = Diagnostics::new(DRIVER_NAME);

        let total = read_vertex_total(&files, order)?;

        let faces_read = read_faces(&files, order, total)?;
        debug!(
            kept = faces_read.faces.len(),
            masked = faces_read.masked,
            "Read TIN faces"
        );

        let corrected = correct_indices(&faces_read.wanted);
        let vertices = read_vertices(&files, order, &corrected, &mut diagnostics)?;

        let faces: Vec<Face> = faces_read
            .faces
            .into_iter()
            .map(|face| face.iter().map(|&raw| corrected.index(raw)).collect())
            .collect();

        let mut mesh = Mesh::new(
            DRIVER_NAME,
            vertices.len(),
            0,
            faces.len(),
            MAX_VERTICES_PER_FACE_TIN,
            Aabb::from_vertices(&vertices),
            path.to_string_lossy(),
        );
        mesh.faces = faces;

        add_bed_elevation_dataset_group(&mut mesh, &vertices);
        mesh.vertices = vertices;
        if let Some(group) = mesh.dataset_groups.last_mut() {
            group.set_name(ALTITUDE);
        }

        if let Some(wkt) = read_crs_wkt(&files.crs) {
            mesh.set_crs_wkt(wkt);
        }

        info!(
            tin = %tin_name(path).unwrap_or_default(),
            raw_vertices = total,
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            masked_faces = faces_read.masked,
            "Loaded Esri TIN"
        );

        Ok(LoadedMesh::new(mesh, diagnostics))
    }
}

/// Load an Esri TIN dataset with big-endian data files.
///
/// # Errors
///
/// Returns an error if:
/// - Neither vertex count file opens, the mask metadata is malformed, or a
///   binary value is truncated or out of range (`UnknownFormat`)
/// - The face file ends inside a triple (`InvalidData`)
/// - A required companion file is missing (`FileNotFound`)
pub fn load_esri_tin<P: AsRef<Path>>(path: P) -> IoResult<LoadedMesh> {
    DriverEsriTin::new().load(path.as_ref())
}

/// Name of the TIN: the directory holding its companion files.
///
/// `None` when `uri` has no parent directory name.
#[must_use]
pub fn tin_name(uri: &Path) -> Option<String> {
    uri.parent()?
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// First line of `prj.adf`, unless missing, empty or the unknown-CRS marker.
fn read_crs_wkt(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line).ok()?;
    let wkt = line.trim_end_matches(['\r', '\n']);
    if wkt.is_empty() || wkt == UNKNOWN_CRS {
        None
    } else {
        Some(wkt.to_string())
    }
}

fn open_required(path: &Path) -> IoResult<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|_| IoError::FileNotFound {
            path: path.to_path_buf(),
        })
}

/// Raw vertex count, superpoints and isolated vertices included.
fn read_vertex_total(files: &TinFiles, order: ByteOrder) -> IoResult<usize> {
    let file = File::open(&files.denv)
        .or_else(|_| File::open(&files.denv9))
        .map_err(|_| {
            IoError::unknown_format(format!(
                "neither {} nor {} could be opened",
                files.denv.display(),
                files.denv9.display()
            ))
        })?;
    let total = order
        .read_i32(&mut BufReader::new(file))?
        .ok_or_else(|| IoError::unknown_format("vertex count file is empty"))?;
    usize::try_from(total)
        .map_err(|_| IoError::unknown_format(format!("negative vertex count {total}")))
}

/// Result of the first pass.
struct FacesRead {
    /// Unmasked faces, holding raw 0-based indices.
    faces: Vec<Face>,
    /// Per raw vertex: referenced by an unmasked face.
    wanted: Vec<bool>,
    masked: usize,
}

fn read_faces(files: &TinFiles, order: ByteOrder, total: usize) -> IoResult<FacesRead> {
    let mut faces_in = open_required(&files.faces)?;
    let mut mask_in = open_required(&files.mask)?;
    let mut mask_index_in = open_required(&files.mask_index)?;

    let mask_bits = read_mask_header(&mut mask_in, &mut mask_index_in)?;

    let mut read = FacesRead {
        faces: Vec::new(),
        wanted: vec![false; total],
        masked: 0,
    };
    let mut bit = 0usize;
    // Signed, so the shift smears a set top bit over the faces past the mask
    let mut mask = 0i32;

    loop {
        if bit % 32 == 0 && bit < mask_bits {
            mask = MASK_ORDER
                .read_i32(&mut mask_in)?
                .ok_or_else(|| IoError::unknown_format("mask bit array is truncated"))?;
        }

        let Some(triple) = read_triple(&mut faces_in, order)? else {
            break;
        };

        if mask & 1 == 0 {
            let mut face = Face::with_capacity(3);
            for raw in triple {
                let index = raw
                    .checked_sub(1)
                    .and_then(|i| usize::try_from(i).ok())
                    .filter(|&i| i < total)
                    .ok_or_else(|| {
                        IoError::unknown_format(format!(
                            "face {} references vertex {raw} of {total}",
                            bit + 1
                        ))
                    })?;
                read.wanted[index] = true;
                face.push(index);
            }
            read.faces.push(face);
        } else {
            read.masked += 1;
        }

        bit += 1;
        mask >>= 1;
    }

    Ok(read)
}

/// Locate the mask data and return its bit count.
fn read_mask_header<M, X>(mask: &mut M, mask_index: &mut X) -> IoResult<usize>
where
    M: Read + Seek,
    X: Read + Seek,
{
    let malformed = |what: &str| IoError::unknown_format(format!("mask {what} is malformed"));

    mask_index
        .seek(SeekFrom::End(-4))
        .map_err(|_| malformed("index"))?;
    let begin = MASK_ORDER
        .read_i32(mask_index)?
        .ok_or_else(|| malformed("index"))?;

    mask.seek(SeekFrom::End(-i64::from(begin) * 2))
        .map_err(|_| malformed("offset"))?;
    let _integer_count = MASK_ORDER
        .read_i32(mask)?
        .ok_or_else(|| malformed("header"))?;
    skip(mask, 4).map_err(|_| malformed("header"))?;
    let bits = MASK_ORDER
        .read_i32(mask)?
        .ok_or_else(|| malformed("header"))?;

    Ok(usize::try_from(bits).unwrap_or(0))
}

fn skip<R: Read>(reader: &mut R, count: u64) -> io::Result<()> {
    let skipped = io::copy(&mut reader.by_ref().take(count), &mut io::sink())?;
    if skipped == count {
        Ok(())
    } else {
        Err(io::ErrorKind::UnexpectedEof.into())
    }
}

/// Next face triple; `None` at a clean end of file.
fn read_triple<R: Read>(reader: &mut R, order: ByteOrder) -> IoResult<Option<[i32; 3]>> {
    let Some(first) = order.read_i32(reader)? else {
        return Ok(None);
    };
    let mut triple = [first, 0, 0];
    for value in &mut triple[1..] {
        *value = order
            .read_i32(reader)?
            .ok_or_else(|| IoError::invalid_data("face file ends inside a face"))?;
    }
    Ok(Some(triple))
}

/// Raw to corrected vertex index table.
struct CorrectedIndices {
    slots: Vec<Option<usize>>,
    count: usize,
}

impl CorrectedIndices {
    fn index(&self, raw: usize) -> usize {
        self.slots
            .get(raw)
            .copied()
            .flatten()
            .unwrap_or(INVALID_INDEX)
    }
}

/// Number wanted raw vertices consecutively, preserving their order.
fn correct_indices(wanted: &[bool]) -> CorrectedIndices {
    let mut count = 0;
    let slots = wanted
        .iter()
        .map(|&is_wanted| {
            is_wanted.then(|| {
                count += 1;
                count - 1
            })
        })
        .collect();
    CorrectedIndices { slots, count }
}

fn read_vertices(
    files: &TinFiles,
    order: ByteOrder,
    corrected: &CorrectedIndices,
    diagnostics: &mut Diagnostics,
) -> IoResult<Vec<Vertex>> {
    let mut xy_in = open_required(&files.xy)?;
    let mut z_in = open_required(&files.z)?;

    let mut vertices = vec![Vertex::default(); corrected.count];
    let mut raw_read = 0usize;

    for slot in &corrected.slots {
        let Some(x) = order.read_f64(&mut xy_in)? else {
            break;
        };
        let y = order
            .read_f64(&mut xy_in)?
            .ok_or_else(|| IoError::unknown_format("XY file ends inside a vertex"))?;
        let z = order
            .read_f32(&mut z_in)?
            .ok_or_else(|| IoError::unknown_format("Z file has fewer values than XY file"))?;

        if let Some(index) = *slot {
            vertices[index] = Vertex::from_coords(x, y, f64::from(z));
        }
        raw_read += 1;
    }

    if raw_read < corrected.slots.len() {
        diagnostics.info(format!(
            "vertex files hold {raw_read} of {} vertices",
            corrected.slots.len()
        ));
    }
    debug!(raw_read, stored = vertices.len(), "Read TIN vertices");

    Ok(vertices)
}

//! Mesh format decoders for hydromesh.
//!
//! This crate reads unstructured hydraulic meshes into the
//! [`hydromesh_types::Mesh`] model:
//!
//! - **2DM** - line-oriented ASCII mesh, read and write
//! - **Esri TIN** - directory of big-endian binary companion files, read only
//!
//! Each format is a [`Driver`]. Drivers keep no state between calls, so
//! different files can be decoded from different threads.
//!
//! # Example
//!
//! ```no_run
//! use hydromesh_io::{load_2dm, save_2dm};
//!
//! let loaded = load_2dm("floodplain.2dm").unwrap();
//! println!("status: {:?}", loaded.status());
//!
//! save_2dm(&loaded.mesh, "floodplain_copy.2dm").unwrap();
//! ```
//!
//! # Format Detection
//!
//! [`load_mesh`] sniffs the file with each driver's [`Driver::can_read`]:
//!
//! ```no_run
//! use hydromesh_io::{load_mesh, MeshFormat};
//!
//! let loaded = load_mesh("survey/river_tin/tnxy.adf").unwrap();
//! assert_eq!(loaded.mesh.driver_name, "ESRI_TIN");
//!
//! assert_eq!(MeshFormat::from_path("mesh.2dm"), Some(MeshFormat::TwoDm));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod config;
mod diagnostics;
mod driver;
mod error;
mod esri_tin;
mod two_dm;

pub use config::{ByteOrder, TextMeshConfig, TinConfig};
pub use diagnostics::{Diagnostic, Diagnostics, LoadedMesh, Severity};
pub use driver::{Capability, Driver};
pub use error::{IoError, IoResult, Status};
pub use esri_tin::{
    load_esri_tin, tin_name, DriverEsriTin, TinFiles, ALTITUDE, MAX_VERTICES_PER_FACE_TIN,
};
pub use two_dm::{
    load_2dm, read_2dm, save_2dm, write_2dm, Driver2dm, FACE_ELEVATION,
    MAX_VERTICES_PER_FACE_2DM,
};

use std::path::Path;

use hydromesh_types::Mesh;
use tracing::debug;

/// Supported mesh formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// 2DM text mesh.
    TwoDm,
    /// Esri TIN directory.
    EsriTin,
}

impl MeshFormat {
    /// Every format, in sniffing order.
    pub const ALL: [Self; 2] = [Self::TwoDm, Self::EsriTin];

    /// Detect format from file extension.
    ///
    /// Any `.adf` file is taken as part of a TIN directory.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "2dm" => Some(Self::TwoDm),
            "adf" => Some(Self::EsriTin),
            _ => None,
        }
    }

    /// Detect format by asking each driver whether it can read `path`.
    ///
    /// The text format is tried first since its check is a single line read.
    #[must_use]
    pub fn detect<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path = path.as_ref();
        Self::ALL
            .into_iter()
            .find(|format| format.driver().can_read(path))
    }

    /// A driver for this format with default settings.
    #[must_use]
    pub fn driver(self) -> Box<dyn Driver> {
        match self {
            Self::TwoDm => Box::new(Driver2dm::new()),
            Self::EsriTin => Box::new(DriverEsriTin::new()),
        }
    }

    /// Canonical file extension.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::TwoDm => "2dm",
            Self::EsriTin => "adf",
        }
    }
}

/// Load a mesh, detecting its format from the file contents.
///
/// # Errors
///
/// Returns `UnknownFormat` if no driver recognizes the file, otherwise
/// whatever the selected driver reports.
///
/// # Example
///
/// ```no_run
/// use hydromesh_io::load_mesh;
///
/// let loaded = load_mesh("channel.2dm").unwrap();
/// for warning in loaded.warnings() {
///     eprintln!("{warning}");
/// }
/// ```
pub fn load_mesh<P: AsRef<Path>>(path: P) -> IoResult<LoadedMesh> {
    let path = path.as_ref();
    let format = MeshFormat::detect(path).ok_or_else(|| {
        IoError::unknown_format(format!("no driver can read {}", path.display()))
    })?;
    debug!(path = %path.display(), ?format, "Detected mesh format");
    format.driver().load(path)
}

/// Save a mesh, selecting the format from the file extension.
///
/// # Errors
///
/// Returns an error if:
/// - The extension is not recognized (`UnknownFormat`)
/// - The selected driver cannot save (`MissingDriverCapability`)
/// - The file cannot be written
///
/// # Example
///
/// ```no_run
/// use hydromesh_io::{load_mesh, save_mesh};
///
/// let loaded = load_mesh("survey/river_tin/tnod.adf").unwrap();
/// save_mesh(&loaded.mesh, "river.2dm").unwrap();
/// ```
pub fn save_mesh<P: AsRef<Path>>(mesh: &Mesh, path: P) -> IoResult<()> {
    let path = path.as_ref();
    let format = MeshFormat::from_path(path).ok_or_else(|| {
        IoError::unknown_format(format!(
            "unrecognized extension `{}`",
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
        ))
    })?;
    format.driver().save(path, mesh)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn format_from_path() {
        assert_eq!(MeshFormat::from_path("mesh.2dm"), Some(MeshFormat::TwoDm));
        assert_eq!(MeshFormat::from_path("MESH.2DM"), Some(MeshFormat::TwoDm));
        assert_eq!(
            MeshFormat::from_path("/data/tin/tnxy.adf"),
            Some(MeshFormat::EsriTin)
        );
        assert_eq!(MeshFormat::from_path("mesh.stl"), None);
        assert_eq!(MeshFormat::from_path("mesh"), None);
        assert_eq!(MeshFormat::from_path(""), None);
    }

    #[test]
    fn format_extension() {
        assert_eq!(MeshFormat::TwoDm.extension(), "2dm");
        assert_eq!(MeshFormat::EsriTin.extension(), "adf");
    }

    #[test]
    fn detect_by_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_extension");
        fs::write(&path, "MESH2D\nND 1 0 0 0\n").unwrap();
        assert_eq!(MeshFormat::detect(&path), Some(MeshFormat::TwoDm));

        let other = dir.path().join("other.2dm");
        fs::write(&other, "solid cube\n").unwrap();
        assert_eq!(MeshFormat::detect(&other), None);
        assert_eq!(
            load_mesh(&other).unwrap_err().status(),
            Status::ErrUnknownFormat
        );
    }

    #[test]
    fn save_to_tin_is_missing_capability() {
        let dir = tempfile::tempdir().unwrap();
        let mesh = Mesh::new("MEMORY", 0, 0, 0, 3, hydromesh_types::Aabb::empty(), "x");
        let err = save_mesh(&mesh, dir.path().join("tnxy.adf")).unwrap_err();
        assert_eq!(err.status(), Status::ErrMissingDriverCapability);

        let err = save_mesh(&mesh, dir.path().join("mesh.obj")).unwrap_err();
        assert_eq!(err.status(), Status::ErrUnknownFormat);
    }

    #[test]
    fn driver_names() {
        assert_eq!(MeshFormat::TwoDm.driver().name(), "2DM");
        assert_eq!(MeshFormat::EsriTin.driver().name(), "ESRI_TIN");
        assert_eq!(MeshFormat::TwoDm.driver().long_name(), "2DM Mesh File");
    }
}

//! The contract every format driver implements.

use std::path::Path;

use hydromesh_types::Mesh;

use crate::diagnostics::LoadedMesh;
use crate::error::{IoError, IoResult};

bitflags::bitflags! {
    /// Operations a driver supports.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capability: u32 {
        /// The driver can decode meshes.
        const READ_MESH = 0b0000_0001;
        /// The driver can encode meshes.
        const SAVE_MESH = 0b0000_0010;
    }
}

/// A mesh format driver.
///
/// Drivers hold no state between calls: each [`load`](Driver::load) owns its
/// buffers and returns its diagnostics, so decoding different files from
/// different threads is safe.
pub trait Driver {
    /// Short format name, e.g. `"2DM"`.
    fn name(&self) -> &'static str;

    /// Human readable label.
    fn long_name(&self) -> &'static str;

    /// Glob pattern of the files this driver is associated with.
    fn filters(&self) -> &'static str;

    /// Supported operations.
    fn capabilities(&self) -> Capability;

    /// Whether the driver supports every operation in `capability`.
    fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(capability)
    }

    /// Cheap format sniff.
    ///
    /// Never fails: any I/O problem yields `false`.
    fn can_read(&self, path: &Path) -> bool;

    /// Decode the mesh at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error on any unrecoverable structural problem; recoverable
    /// anomalies are returned as diagnostics of the [`LoadedMesh`].
    fn load(&self, path: &Path) -> IoResult<LoadedMesh>;

    /// Encode `mesh` to `path`.
    ///
    /// Only meaningful when [`Capability::SAVE_MESH`] is set.
    ///
    /// # Errors
    ///
    /// The default implementation always returns
    /// [`IoError::MissingDriverCapability`].
    fn save(&self, path: &Path, mesh: &Mesh) -> IoResult<()> {
        let _ = (path, mesh);
        Err(IoError::MissingDriverCapability {
            driver: self.name(),
            operation: "save meshes",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::error::Status;
    use hydromesh_types::Aabb;

    struct ReadOnly;

    impl Driver for ReadOnly {
        fn name(&self) -> &'static str {
            "READ_ONLY"
        }

        fn long_name(&self) -> &'static str {
            "Read only test driver"
        }

        fn filters(&self) -> &'static str {
            "*.ro"
        }

        fn capabilities(&self) -> Capability {
            Capability::READ_MESH
        }

        fn can_read(&self, path: &Path) -> bool {
            path.extension().is_some_and(|e| e == "ro")
        }

        fn load(&self, path: &Path) -> IoResult<LoadedMesh> {
            let mesh = Mesh::new(self.name(), 0, 0, 0, 3, Aabb::empty(), path.to_string_lossy());
            Ok(LoadedMesh::new(mesh, Diagnostics::new(self.name())))
        }
    }

    #[test]
    fn capability_checks() {
        let driver = ReadOnly;
        assert!(driver.has_capability(Capability::READ_MESH));
        assert!(!driver.has_capability(Capability::SAVE_MESH));
        assert!(!driver.has_capability(Capability::READ_MESH | Capability::SAVE_MESH));
    }

    #[test]
    fn default_save_is_missing_capability() {
        let driver = ReadOnly;
        let mesh = Mesh::new("X", 0, 0, 0, 3, Aabb::empty(), "x");
        let result = driver.save(Path::new("out.ro"), &mesh);
        assert!(matches!(
            result,
            Err(IoError::MissingDriverCapability { driver: "READ_ONLY", .. })
        ));
        assert_eq!(
            result.err().map(|e| e.status()),
            Some(Status::ErrMissingDriverCapability)
        );
    }

    #[test]
    fn drivers_are_object_safe() {
        let drivers: Vec<Box<dyn Driver>> = vec![Box::new(ReadOnly)];
        assert!(drivers[0].can_read(Path::new("a.ro")));
        assert!(drivers[0].load(Path::new("a.ro")).is_ok());
    }
}

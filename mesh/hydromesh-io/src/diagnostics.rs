//! Non-fatal findings recorded while decoding.
//!
//! Decoders never keep a process-wide "last status". Recoverable anomalies are
//! collected per call and handed back with the mesh in a [`LoadedMesh`];
//! fatal problems are returned as [`IoError`](crate::IoError).

use std::fmt;

use hydromesh_types::Mesh;
use tracing::{info, warn};

use crate::error::Status;

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational.
    Info,
    /// Recoverable anomaly; decoding continued.
    Warning,
}

/// One (severity, driver, status, message) record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// How serious the finding is.
    pub severity: Severity,
    /// Short name of the reporting driver.
    pub driver: &'static str,
    /// Status code of the finding.
    pub status: Status,
    /// Human readable description.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {:?}: {}",
            self.driver, self.status, self.message
        )
    }
}

/// Per-call diagnostic sink.
///
/// Every record is also emitted as a `tracing` event.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    driver: &'static str,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty sink for the named driver.
    #[must_use]
    pub const fn new(driver: &'static str) -> Self {
        Self {
            driver,
            entries: Vec::new(),
        }
    }

    /// Record a recoverable anomaly.
    pub fn warning(&mut self, status: Status, message: impl Into<String>) {
        let message = message.into();
        warn!(driver = self.driver, status = ?status, "{message}");
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            driver: self.driver,
            status,
            message,
        });
    }

    /// Record an informational note.
    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!(driver = self.driver, "{message}");
        self.entries.push(Diagnostic {
            severity: Severity::Info,
            driver: self.driver,
            status: Status::None,
            message,
        });
    }

    /// Number of warnings recorded so far.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// All records in the order they were made.
    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Consume the sink.
    #[must_use]
    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

/// A successfully decoded mesh together with what was reported on the way.
#[derive(Debug, Clone)]
pub struct LoadedMesh {
    /// The decoded mesh.
    pub mesh: Mesh,
    /// Every diagnostic recorded during the decode.
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadedMesh {
    /// Bundle a mesh with the contents of a sink.
    #[must_use]
    pub fn new(mesh: Mesh, diagnostics: Diagnostics) -> Self {
        Self {
            mesh,
            diagnostics: diagnostics.into_entries(),
        }
    }

    /// Status of the decode: the first warning recorded, or [`Status::None`].
    #[must_use]
    pub fn status(&self) -> Status {
        self.warnings().next().map_or(Status::None, |d| d.status)
    }

    /// Warnings only.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Drop the diagnostics and keep the mesh.
    #[must_use]
    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydromesh_types::Aabb;

    #[test]
    fn status_is_first_warning() {
        let mut sink = Diagnostics::new("TEST");
        sink.info("starting");
        sink.warning(Status::WarnElementWithInvalidNode, "face 3");
        sink.warning(Status::WarnElementNotUnique, "vertex 7");
        assert_eq!(sink.warning_count(), 2);

        let loaded = LoadedMesh::new(Mesh::new("TEST", 0, 0, 0, 3, Aabb::empty(), "x"), sink);
        assert_eq!(loaded.status(), Status::WarnElementWithInvalidNode);
        assert_eq!(loaded.diagnostics.len(), 3);
    }

    #[test]
    fn clean_decode_has_no_status() {
        let loaded = LoadedMesh::new(
            Mesh::new("TEST", 0, 0, 0, 3, Aabb::empty(), "x"),
            Diagnostics::new("TEST"),
        );
        assert_eq!(loaded.status(), Status::None);
    }

    #[test]
    fn display_includes_driver() {
        let mut sink = Diagnostics::new("2DM");
        sink.warning(Status::WarnElementNotUnique, "vertex 4 is not unique");
        let text = sink.entries()[0].to_string();
        assert!(text.starts_with("[2DM]"));
        assert!(text.contains("vertex 4"));
    }
}

//! Numbered snapshot series.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::vtk::{write_vtk_exact, write_vtk_solution};
use crate::error::OutputError;
use crate::field::SyntheticField;
use crate::mesh::QuadMesh;

/// Writes one snapshot of a mesh's state per call.
///
/// The convergence harness and the time-stepping driver call this once per
/// level or step; `exact` is the analytic field to write alongside, if any.
pub trait SolutionDocumenter<M> {
    fn document(&mut self, mesh: &M, exact: Option<&dyn SyntheticField>) -> Result<(), OutputError>;
}

/// Zero-padded snapshot number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SnapshotCounter(usize);

impl SnapshotCounter {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn number(&self) -> usize {
        self.0
    }

    pub fn increment(&mut self) {
        self.0 += 1;
    }

    /// `{stem}{number:05}.{extension}`
    pub fn file_name(&self, stem: &str, extension: &str) -> String {
        format!("{}{:05}.{}", stem, self.0, extension)
    }
}

impl fmt::Display for SnapshotCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:05}", self.0)
    }
}

/// VTU snapshot series in a directory.
#[derive(Clone, Debug)]
pub struct VtkDocumenter {
    directory: PathBuf,
    counter: SnapshotCounter,
}

impl VtkDocumenter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            counter: SnapshotCounter::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn counter(&self) -> SnapshotCounter {
        self.counter
    }
}

impl SolutionDocumenter<QuadMesh> for VtkDocumenter {
    fn document(&mut self, mesh: &QuadMesh, exact: Option<&dyn SyntheticField>) -> Result<(), OutputError> {
        let soln = self.directory.join(self.counter.file_name("soln", "vtu"));
        write_vtk_solution(&soln, mesh)?;
        debug!(path = %soln.display(), "wrote solution snapshot");

        if let Some(field) = exact {
            let path = self
                .directory
                .join(self.counter.file_name("analytical_vorticity", "vtu"));
            write_vtk_exact(&path, mesh, field)?;
            debug!(path = %path.display(), field = field.name(), "wrote analytic snapshot");
        }

        self.counter.increment();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::SinCosField;
    use crate::mesh::GridMesh;
    use crate::types::{Bounds2D, Resolution2D};
    use tempfile::tempdir;

    #[test]
    fn test_counter_padding() {
        let mut counter = SnapshotCounter::new();
        assert_eq!(counter.file_name("soln", "vtu"), "soln00000.vtu");
        counter.increment();
        counter.increment();
        assert_eq!(counter.to_string(), "00002");
        assert_eq!(counter.number(), 2);
    }

    #[test]
    fn test_pairs_written_with_exact_field() {
        let dir = tempdir().unwrap();
        let mesh = QuadMesh::uniform(Resolution2D::square(4), Bounds2D::new(0.0, 1.0, 0.0, 1.0));
        let field = SinCosField::from_bounds(&mesh.bounds());
        let mut doc = VtkDocumenter::new(dir.path());

        doc.document(&mesh, Some(&field)).unwrap();
        doc.document(&mesh, None).unwrap();

        assert!(dir.path().join("soln00000.vtu").exists());
        assert!(dir.path().join("analytical_vorticity00000.vtu").exists());
        assert!(dir.path().join("soln00001.vtu").exists());
        assert!(!dir.path().join("analytical_vorticity00001.vtu").exists());
        assert_eq!(doc.counter().number(), 2);
    }

    #[test]
    fn test_failed_write_keeps_counter() {
        let dir = tempdir().unwrap();
        let mesh = QuadMesh::uniform(Resolution2D::square(4), Bounds2D::new(0.0, 1.0, 0.0, 1.0));
        let mut doc = VtkDocumenter::new(dir.path().join("missing"));
        assert!(doc.document(&mesh, None).is_err());
        assert_eq!(doc.counter().number(), 0);
    }
}

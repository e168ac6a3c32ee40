//! Per-boundary node listing.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::OutputError;
use crate::mesh::{GridBoundary, GridMesh};

/// File name of the boundary listing inside the output directory.
pub const BOUNDARIES_FILE_NAME: &str = "boundaries.dat";

/// Write the coordinates of every boundary node, one zone per boundary.
pub fn write_boundaries<M: GridMesh>(path: impl AsRef<Path>, mesh: &M) -> Result<(), OutputError> {
    let path = path.as_ref();
    let result = (|| -> std::io::Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        for boundary in GridBoundary::ALL {
            writeln!(w, "ZONE T=\"boundary {}\"", boundary.index())?;
            for k in mesh.boundary_nodes(boundary) {
                let [x, y] = mesh.nodes()[k].x;
                writeln!(w, "{} {}", x, y)?;
            }
        }
        w.flush()
    })();
    result.map_err(|e| OutputError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::QuadMesh;
    use crate::types::{Bounds2D, Resolution2D};
    use tempfile::tempdir;

    #[test]
    fn test_one_zone_per_boundary() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(BOUNDARIES_FILE_NAME);
        let mesh = QuadMesh::uniform(Resolution2D::new(3, 2), Bounds2D::new(0.0, 3.0, 0.0, 2.0));

        write_boundaries(&path, &mesh).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let zones: Vec<&str> = content.lines().filter(|l| l.starts_with("ZONE")).collect();
        assert_eq!(zones.len(), 4);
        assert_eq!(zones[2], "ZONE T=\"boundary 2\"");
        // 4 + 3 + 4 + 3 nodes
        assert_eq!(content.lines().count(), 4 + 14);
        // Bottom boundary starts at the lower left corner
        assert_eq!(content.lines().nth(1), Some("0 0"));
    }
}

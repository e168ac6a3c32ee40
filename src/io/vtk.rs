//! VTK output for structured quad meshes.
//!
//! Provides VTU (XML UnstructuredGrid) output for visualization in ParaView
//! and other VTK-compatible tools. Every mesh node becomes a VTK point and
//! every element a `VTK_QUAD` cell, so graded spacing shows as-is.
//!
//! Three kinds of file are written:
//! - [`write_vtk_mesh`]: geometry and pin flags
//! - [`write_vtk_solution`]: nodal velocity and recovered vorticity
//! - [`write_vtk_exact`]: an analytic field sampled at the nodes

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::OutputError;
use crate::field::{N_QUANTITIES, SyntheticField};
use crate::mesh::{GridMesh, QuadMesh};

/// VTK cell type of a four-node quadrilateral.
const VTK_QUAD: u8 = 9;

/// VTK XML writer helper.
struct VtkWriter<W: Write> {
    writer: BufWriter<W>,
    indent: usize,
}

impl<W: Write> VtkWriter<W> {
    fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            indent: 0,
        }
    }

    fn write_indent(&mut self) -> std::io::Result<()> {
        for _ in 0..self.indent {
            write!(self.writer, "  ")?;
        }
        Ok(())
    }

    fn write_header(&mut self) -> std::io::Result<()> {
        writeln!(self.writer, "<?xml version=\"1.0\"?>")?;
        writeln!(
            self.writer,
            "<VTKFile type=\"UnstructuredGrid\" version=\"0.1\" byte_order=\"LittleEndian\">"
        )?;
        self.indent += 1;
        Ok(())
    }

    fn write_footer(&mut self) -> std::io::Result<()> {
        self.indent -= 1;
        writeln!(self.writer, "</VTKFile>")?;
        self.writer.flush()
    }

    fn start_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> std::io::Result<()> {
        self.write_indent()?;
        write!(self.writer, "<{}", name)?;
        for (key, value) in attrs {
            write!(self.writer, " {}=\"{}\"", key, value)?;
        }
        writeln!(self.writer, ">")?;
        self.indent += 1;
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> std::io::Result<()> {
        self.indent -= 1;
        self.write_indent()?;
        writeln!(self.writer, "</{}>", name)
    }

    /// Values separated by spaces, `per_line` to a line.
    fn write_values<T>(
        &mut self,
        data: &[T],
        per_line: usize,
        fmt: impl Fn(&T) -> String,
    ) -> std::io::Result<()> {
        self.indent += 1;
        self.write_indent()?;
        for (i, v) in data.iter().enumerate() {
            write!(self.writer, "{}", fmt(v))?;
            if i + 1 < data.len() {
                if (i + 1) % per_line == 0 {
                    writeln!(self.writer)?;
                    self.write_indent()?;
                } else {
                    write!(self.writer, " ")?;
                }
            }
        }
        writeln!(self.writer)?;
        self.indent -= 1;
        Ok(())
    }

    fn write_data_array_f64(&mut self, name: &str, data: &[f64]) -> std::io::Result<()> {
        self.write_indent()?;
        writeln!(
            self.writer,
            "<DataArray type=\"Float64\" Name=\"{}\" format=\"ascii\">",
            name
        )?;
        self.write_values(data, 6, |v| format!("{:.10e}", v))?;
        self.write_indent()?;
        writeln!(self.writer, "</DataArray>")
    }

    fn write_data_array_int<T: Display>(
        &mut self,
        vtk_type: &str,
        name: &str,
        data: &[T],
    ) -> std::io::Result<()> {
        self.write_indent()?;
        writeln!(
            self.writer,
            "<DataArray type=\"{}\" Name=\"{}\" format=\"ascii\">",
            vtk_type, name
        )?;
        self.write_values(data, 20, |v| v.to_string())?;
        self.write_indent()?;
        writeln!(self.writer, "</DataArray>")
    }

    fn write_points(&mut self, points: &[[f64; 2]]) -> std::io::Result<()> {
        self.start_element("Points", &[])?;
        self.write_indent()?;
        writeln!(
            self.writer,
            "<DataArray type=\"Float64\" NumberOfComponents=\"3\" format=\"ascii\">"
        )?;
        self.write_values(points, 2, |[x, y]| format!("{:.10e} {:.10e} 0.0", x, y))?;
        self.write_indent()?;
        writeln!(self.writer, "</DataArray>")?;
        self.end_element("Points")
    }

    fn write_cells(&mut self, cells: &[[usize; 4]]) -> std::io::Result<()> {
        self.start_element("Cells", &[])?;

        let connectivity: Vec<usize> = cells.iter().flatten().copied().collect();
        self.write_data_array_int("Int32", "connectivity", &connectivity)?;

        let offsets: Vec<usize> = (1..=cells.len()).map(|i| 4 * i).collect();
        self.write_data_array_int("Int32", "offsets", &offsets)?;

        self.write_data_array_int("UInt8", "types", &vec![VTK_QUAD; cells.len()])?;

        self.end_element("Cells")
    }
}

/// Write the mesh geometry and `point_data` arrays to `path`.
fn write_vtu(path: &Path, mesh: &QuadMesh, point_data: &[(&str, Vec<f64>)]) -> Result<(), OutputError> {
    let points: Vec<[f64; 2]> = mesh.nodes().iter().map(|n| n.x).collect();
    let cells: Vec<[usize; 4]> = mesh.elements().iter().map(|e| e.corners()).collect();

    let result = (|| -> std::io::Result<()> {
        let mut writer = VtkWriter::new(File::create(path)?);
        writer.write_header()?;
        writer.start_element("UnstructuredGrid", &[])?;
        writer.start_element(
            "Piece",
            &[
                ("NumberOfPoints", &points.len().to_string()),
                ("NumberOfCells", &cells.len().to_string()),
            ],
        )?;
        writer.write_points(&points)?;
        writer.write_cells(&cells)?;

        if let Some((first, _)) = point_data.first() {
            writer.start_element("PointData", &[("Scalars", *first)])?;
            for (name, data) in point_data {
                writer.write_data_array_f64(name, data)?;
            }
            writer.end_element("PointData")?;
        }

        let ids: Vec<usize> = (0..cells.len()).collect();
        writer.start_element("CellData", &[("Scalars", "element_id")])?;
        writer.write_data_array_int("Int32", "element_id", &ids)?;
        writer.end_element("CellData")?;

        writer.end_element("Piece")?;
        writer.end_element("UnstructuredGrid")?;
        writer.write_footer()
    })();

    result.map_err(|e| OutputError::io(path, e))
}

/// Nodal average of the recovered corner values of the adjacent elements,
/// or `None` before recovery.
pub fn nodal_recovered(mesh: &QuadMesh) -> Option<Vec<[f64; N_QUANTITIES]>> {
    let mut sums = vec![[0.0; N_QUANTITIES]; mesh.n_nodes()];
    let mut counts = vec![0usize; mesh.n_nodes()];
    for element in mesh.elements() {
        let recovered = element.recovered()?;
        for (k, &c) in element.corners().iter().enumerate() {
            for q in 0..N_QUANTITIES {
                sums[c][q] += recovered[k][q];
            }
            counts[c] += 1;
        }
    }
    for (sum, &count) in sums.iter_mut().zip(&counts) {
        if count > 0 {
            for v in sum.iter_mut() {
                *v /= count as f64;
            }
        }
    }
    Some(sums)
}

/// Write the mesh with its velocity pin flags.
pub fn write_vtk_mesh(path: impl AsRef<Path>, mesh: &QuadMesh) -> Result<(), OutputError> {
    let flag = |c: usize| -> Vec<f64> {
        mesh.nodes()
            .iter()
            .map(|n| if n.pinned[c] { 1.0 } else { 0.0 })
            .collect()
    };
    write_vtu(path.as_ref(), mesh, &[("pinned_u", flag(0)), ("pinned_v", flag(1))])
}

/// Write nodal velocity and, once recovered, vorticity and its first
/// derivatives.
pub fn write_vtk_solution(path: impl AsRef<Path>, mesh: &QuadMesh) -> Result<(), OutputError> {
    let mut data: Vec<(&str, Vec<f64>)> = vec![
        ("u", mesh.nodes().iter().map(|n| n.values[0]).collect()),
        ("v", mesh.nodes().iter().map(|n| n.values[1]).collect()),
    ];
    if let Some(recovered) = nodal_recovered(mesh) {
        for (q, name) in [(0, "vorticity"), (1, "dvort_dx"), (2, "dvort_dy")] {
            data.push((name, recovered.iter().map(|r| r[q]).collect()));
        }
    }
    write_vtu(path.as_ref(), mesh, &data)
}

/// Write an analytic field sampled at the mesh nodes.
pub fn write_vtk_exact(
    path: impl AsRef<Path>,
    mesh: &QuadMesh,
    field: &dyn SyntheticField,
) -> Result<(), OutputError> {
    let nodes = mesh.nodes();
    let velocity: Vec<[f64; 2]> = nodes.iter().map(|n| field.velocity(n.x[0], n.x[1])).collect();
    let vorticity: Vec<f64> = nodes
        .iter()
        .map(|n| field.vorticity(n.x[0], n.x[1]).vorticity)
        .collect();

    write_vtu(
        path.as_ref(),
        mesh,
        &[
            ("u", velocity.iter().map(|v| v[0]).collect()),
            ("v", velocity.iter().map(|v| v[1]).collect()),
            ("vorticity", vorticity),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::SinCosField;
    use crate::mesh::{GridBoundary, VorticityElement};
    use crate::recovery::{PatchRecovery, VorticityRecovery};
    use crate::types::{Bounds2D, Resolution2D};
    use std::fs;
    use tempfile::tempdir;

    fn mesh() -> QuadMesh {
        QuadMesh::uniform(Resolution2D::new(4, 4), Bounds2D::new(0.0, 1.0, 0.0, 1.0))
    }

    #[test]
    fn test_write_mesh_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mesh.vtu");
        let mut m = mesh();
        m.pin_on_boundary(GridBoundary::Top, 0);

        write_vtk_mesh(&path, &m).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("VTKFile"));
        assert!(content.contains("NumberOfPoints=\"25\""));
        assert!(content.contains("NumberOfCells=\"16\""));
        assert!(content.contains("Name=\"pinned_u\""));
        assert!(content.trim_end().ends_with("</VTKFile>"));
    }

    #[test]
    fn test_solution_includes_vorticity_after_recovery() {
        let dir = tempdir().unwrap();
        let mut m = mesh();
        let field = SinCosField::from_bounds(&m.bounds());
        m.set_nodal_velocity(&field);

        let before = dir.path().join("before.vtu");
        write_vtk_solution(&before, &m).unwrap();
        assert!(!fs::read_to_string(&before).unwrap().contains("vorticity"));

        for e in m.elements_mut() {
            e.pin_smoothed_vorticity();
        }
        PatchRecovery.recover_vorticity(&mut m).unwrap();

        let after = dir.path().join("after.vtu");
        write_vtk_solution(&after, &m).unwrap();
        assert!(fs::read_to_string(&after).unwrap().contains("Name=\"vorticity\""));
    }

    #[test]
    fn test_nodal_average_of_constant_recovery() {
        let mut m = mesh();
        for e in m.elements_mut() {
            e.pin_smoothed_vorticity();
            e.set_recovered([[2.5; N_QUANTITIES]; 4]).unwrap();
        }
        let nodal = nodal_recovered(&m).unwrap();
        assert!(nodal.iter().all(|r| (r[0] - 2.5).abs() < 1e-14));
    }

    #[test]
    fn test_exact_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("exact.vtu");
        let m = mesh();
        let field = SinCosField::from_bounds(&m.bounds());
        write_vtk_exact(&path, &m, &field).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("Name=\"vorticity\""));
    }

    #[test]
    fn test_unwritable_path_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("mesh.vtu");
        let err = write_vtk_mesh(&path, &mesh()).unwrap_err();
        assert!(err.to_string().contains("mesh.vtu"));
    }
}

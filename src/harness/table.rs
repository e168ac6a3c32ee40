//! Convergence table file.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::OutputError;
use crate::field::{N_QUANTITIES, VorticityQuantity};

/// File name of the convergence table inside the output directory.
pub const TABLE_FILE_NAME: &str = "vorticity_convergence.dat";

/// One completed refinement level: one row of the table.
#[derive(Clone, Debug, PartialEq)]
pub struct RefinementLevel {
    /// Zero-based level index
    pub iteration: usize,
    pub n_elements: usize,
    /// `sqrt(1 / n_elements)`
    pub characteristic_length: f64,
    /// L2 error per quantity, in column order
    pub errors: [f64; N_QUANTITIES],
    /// Total measure of the mesh
    pub area: f64,
}

impl RefinementLevel {
    pub fn error(&self, quantity: VorticityQuantity) -> f64 {
        self.errors[quantity.index()]
    }

    /// Space-delimited row: element count, length, errors, area.
    pub fn to_row(&self) -> String {
        let mut fields = Vec::with_capacity(N_QUANTITIES + 3);
        fields.push(self.n_elements.to_string());
        fields.push(self.characteristic_length.to_string());
        fields.extend(self.errors.iter().map(|e| e.to_string()));
        fields.push(self.area.to_string());
        fields.join(" ")
    }
}

/// The sixteen-column header naming every quantity.
pub fn header() -> String {
    let mut columns = vec!["\"nel\"".to_string(), "\"sqrt(1/nel)\"".to_string()];
    columns.extend(
        VorticityQuantity::ALL
            .iter()
            .map(|q| format!("\"Error({})\"", q.symbol())),
    );
    columns.push("\"Area\"".to_string());
    format!("VARIABLES={}", columns.join(","))
}

/// Convergence table on disk.
///
/// Every write opens the file, writes and closes it again, so no handle
/// outlives a harness phase and a partial run still leaves a valid table.
#[derive(Clone, Debug)]
pub struct ConvergenceTable {
    path: PathBuf,
}

impl ConvergenceTable {
    /// Create (or truncate) the table and write its header.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, OutputError> {
        let path = path.into();
        let file = File::create(&path).map_err(|e| OutputError::io(&path, e))?;
        let mut w = BufWriter::new(file);
        writeln!(w, "{}", header())
            .and_then(|_| w.flush())
            .map_err(|e| OutputError::io(&path, e))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one level.
    pub fn append(&self, level: &RefinementLevel) -> Result<(), OutputError> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| OutputError::io(&self.path, e))?;
        writeln!(file, "{}", level.to_row()).map_err(|e| OutputError::io(&self.path, e))
    }
}

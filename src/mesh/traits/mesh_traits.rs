//! Capability traits for meshes and elements.
//!
//! This module provides the seams the grading transforms, the convergence
//! harness and the recovery procedure are written against:
//!
//! - [`GridMesh`]: nodes, boundaries and elements of a structured 2D grid
//! - [`UniformRefinement`]: split every element into four
//! - [`VorticityElement`]: per-element error integrals and recovery setup
//!
//! # Example
//! ```
//! use gradmesh::mesh::{GridMesh, QuadMesh, VorticityElement};
//! use gradmesh::types::{Bounds2D, Resolution2D};
//!
//! let mesh = QuadMesh::uniform(Resolution2D::new(4, 2), Bounds2D::new(0.0, 2.0, 0.0, 1.0));
//!
//! let area: f64 = mesh
//!     .elements()
//!     .iter()
//!     .map(|e| e.measure(mesh.nodes()))
//!     .sum();
//! assert!((area - 2.0).abs() < 1e-12);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::CapabilityError;
use crate::field::{N_QUANTITIES, SyntheticField, VorticityQuantity};
use crate::mesh::Node;
use crate::types::{Axis, Bounds2D, Resolution2D};

// =============================================================================
// Supporting Types
// =============================================================================

/// Boundaries of a rectangular grid, numbered as the mesh enumerates them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridBoundary {
    /// `y = y_min`, the wall
    Bottom = 0,
    /// `x = x_max`
    Right = 1,
    /// `y = y_max`
    Top = 2,
    /// `x = x_min`
    Left = 3,
}

impl GridBoundary {
    pub const ALL: [GridBoundary; 4] = [Self::Bottom, Self::Right, Self::Top, Self::Left];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(b: usize) -> Option<Self> {
        Self::ALL.get(b).copied()
    }
}

impl fmt::Display for GridBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bottom => write!(f, "bottom"),
            Self::Right => write!(f, "right"),
            Self::Top => write!(f, "top"),
            Self::Left => write!(f, "left"),
        }
    }
}

// =============================================================================
// GridMesh Trait
// =============================================================================

/// Structured 2D grid of nodes and quadrilateral elements.
pub trait GridMesh {
    type Element: VorticityElement;

    /// Element counts per direction.
    fn resolution(&self) -> Resolution2D;

    /// Domain extent.
    fn bounds(&self) -> Bounds2D;

    fn nodes(&self) -> &[Node];

    fn nodes_mut(&mut self) -> &mut [Node];

    fn elements(&self) -> &[Self::Element];

    fn elements_mut(&mut self) -> &mut [Self::Element];

    /// Indices of the nodes on `boundary`, in order along it.
    fn boundary_nodes(&self, boundary: GridBoundary) -> Vec<usize>;

    /// Whether node positions along `axis` have been remapped.
    fn is_graded(&self, axis: Axis) -> bool;

    /// Record that node positions along `axis` have been remapped.
    fn mark_graded(&mut self, axis: Axis);

    #[inline]
    fn n_nodes(&self) -> usize {
        self.nodes().len()
    }

    #[inline]
    fn n_elements(&self) -> usize {
        self.elements().len()
    }

    #[inline]
    fn n_boundaries(&self) -> usize {
        GridBoundary::ALL.len()
    }

    /// Number of unpinned nodal velocity components.
    fn n_dof(&self) -> usize {
        self.nodes()
            .iter()
            .map(|n| n.pinned.iter().filter(|&&p| !p).count())
            .sum()
    }
}

/// Uniform refinement: each element split into four.
pub trait UniformRefinement {
    fn refine_uniformly(&mut self) -> Result<(), CapabilityError>;
}

// =============================================================================
// VorticityElement Trait
// =============================================================================

/// Element-level operations needed to validate vorticity recovery.
///
/// Geometry lives in the mesh's node array, which is passed in rather than
/// owned so elements stay cheap to clone and refine.
pub trait VorticityElement {
    /// Area of the element.
    fn measure(&self, nodes: &[Node]) -> f64;

    /// `∫ (recovered - exact)² dA` over the element for one quantity.
    ///
    /// # Errors
    ///
    /// [`CapabilityError::MissingRecovery`] before recovery has run and
    /// [`CapabilityError::MissingExactField`] without an exact evaluator.
    fn vorticity_error_squared(
        &self,
        nodes: &[Node],
        quantity: VorticityQuantity,
    ) -> Result<f64, CapabilityError>;

    /// Squared errors of all quantities, in column order.
    fn vorticity_errors_squared(&self, nodes: &[Node]) -> Result<[f64; N_QUANTITIES], CapabilityError> {
        let mut out = [0.0; N_QUANTITIES];
        for q in VorticityQuantity::ALL {
            out[q.index()] = self.vorticity_error_squared(nodes, q)?;
        }
        Ok(out)
    }

    /// Install the analytic evaluator errors are measured against.
    fn set_exact_vorticity(&mut self, field: Arc<dyn SyntheticField>);

    /// Fix the smoothed vorticity so recovery may overwrite it.
    fn pin_smoothed_vorticity(&mut self);
}

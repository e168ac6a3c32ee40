//! Structured quadrilateral mesh of a rectangle.

use tracing::debug;

use super::{GridBoundary, GridMesh, Node, QuadElement, UniformRefinement};
use crate::error::{CapabilityError, GeometryError};
use crate::field::VelocityField;
use crate::types::{Axis, Bounds2D, Resolution2D};

/// Structured mesh of `nx × ny` bilinear quadrilaterals.
///
/// Nodes are numbered row by row from the bottom-left corner,
/// `node(i, j) = j * (nx + 1) + i`, and elements likewise,
/// `element(i, j) = j * nx + i`, with counter-clockwise corners.
///
/// Node positions start on a uniform grid but may be remapped by the
/// grading transforms; the topology never changes except through
/// [`refine_uniformly`](UniformRefinement::refine_uniformly).
///
/// # Example
///
/// ```
/// use gradmesh::mesh::{GridBoundary, GridMesh, QuadMesh};
/// use gradmesh::types::{Bounds2D, Resolution2D};
///
/// let mesh = QuadMesh::uniform(Resolution2D::new(3, 2), Bounds2D::new(0.0, 3.0, 0.0, 2.0));
///
/// assert_eq!(mesh.n_nodes(), 12);
/// assert_eq!(mesh.n_elements(), 6);
/// assert_eq!(mesh.boundary_nodes(GridBoundary::Bottom), vec![0, 1, 2, 3]);
/// ```
#[derive(Clone, Debug)]
pub struct QuadMesh {
    resolution: Resolution2D,
    bounds: Bounds2D,
    nodes: Vec<Node>,
    elements: Vec<QuadElement>,
    graded: [bool; 2],
}

impl QuadMesh {
    /// Uniform mesh of `bounds` with the given element counts.
    pub fn uniform(resolution: Resolution2D, bounds: Bounds2D) -> Self {
        let (nx, ny) = (resolution.nx(), resolution.ny());
        let dx = bounds.width() / nx as f64;
        let dy = bounds.height() / ny as f64;

        let mut nodes = Vec::with_capacity(resolution.total_nodes());
        for j in 0..=ny {
            // Pin the last row/column to the bounds exactly
            let y = if j == ny {
                bounds.y_max
            } else {
                bounds.y_min + j as f64 * dy
            };
            for i in 0..=nx {
                let x = if i == nx {
                    bounds.x_max
                } else {
                    bounds.x_min + i as f64 * dx
                };
                nodes.push(Node::new(x, y));
            }
        }

        let mut mesh = Self {
            resolution,
            bounds,
            nodes,
            elements: Vec::new(),
            graded: [false; 2],
        };
        mesh.elements = (0..ny)
            .flat_map(|j| (0..nx).map(move |i| (i, j)))
            .map(|(i, j)| QuadElement::new(mesh.element_index(i, j), mesh.element_corners(i, j)))
            .collect();
        mesh
    }

    #[inline]
    pub fn node_index(&self, i: usize, j: usize) -> usize {
        j * (self.resolution.nx() + 1) + i
    }

    #[inline]
    pub fn element_index(&self, i: usize, j: usize) -> usize {
        j * self.resolution.nx() + i
    }

    #[inline]
    pub fn node(&self, i: usize, j: usize) -> &Node {
        &self.nodes[self.node_index(i, j)]
    }

    fn element_corners(&self, i: usize, j: usize) -> [usize; 4] {
        [
            self.node_index(i, j),
            self.node_index(i + 1, j),
            self.node_index(i + 1, j + 1),
            self.node_index(i, j + 1),
        ]
    }

    /// Set both velocity components at every node from `field`.
    pub fn set_nodal_velocity<F: VelocityField + ?Sized>(&mut self, field: &F) {
        for node in &mut self.nodes {
            node.values = field.velocity(node.x[0], node.x[1]);
        }
    }

    /// Pin `component` at every node of `boundary`.
    pub fn pin_on_boundary(&mut self, boundary: GridBoundary, component: usize) {
        for n in self.boundary_nodes(boundary) {
            self.nodes[n].pin(component);
        }
    }

    /// Verify that no two neighbouring nodes along a grid line are out of
    /// order: `x` strictly increases along every row, `y` along every column.
    pub fn check_ordering(&self) -> Result<(), GeometryError> {
        let (nx, ny) = (self.resolution.nx(), self.resolution.ny());

        for j in 0..=ny {
            for i in 1..=nx {
                let previous = self.node(i - 1, j).x[0];
                let current = self.node(i, j).x[0];
                if !(current > previous) {
                    return Err(GeometryError::NonMonotonic {
                        axis: Axis::Horizontal,
                        line: j,
                        index: i,
                        previous,
                        current,
                    });
                }
            }
        }

        for i in 0..=nx {
            for j in 1..=ny {
                let previous = self.node(i, j - 1).x[1];
                let current = self.node(i, j).x[1];
                if !(current > previous) {
                    return Err(GeometryError::NonMonotonic {
                        axis: Axis::Vertical,
                        line: i,
                        index: j,
                        previous,
                        current,
                    });
                }
            }
        }

        Ok(())
    }

    /// Smallest edge length over all elements.
    pub fn h_min(&self) -> f64 {
        self.elements
            .iter()
            .flat_map(|e| {
                let c = e.corners();
                (0..4).map(move |k| (c[k], c[(k + 1) % 4]))
            })
            .map(|(a, b)| {
                let (pa, pb) = (self.nodes[a].x, self.nodes[b].x);
                ((pa[0] - pb[0]).powi(2) + (pa[1] - pb[1]).powi(2)).sqrt()
            })
            .fold(f64::INFINITY, f64::min)
    }
}

impl GridMesh for QuadMesh {
    type Element = QuadElement;

    fn resolution(&self) -> Resolution2D {
        self.resolution
    }

    fn bounds(&self) -> Bounds2D {
        self.bounds
    }

    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    fn elements(&self) -> &[QuadElement] {
        &self.elements
    }

    fn elements_mut(&mut self) -> &mut [QuadElement] {
        &mut self.elements
    }

    fn boundary_nodes(&self, boundary: GridBoundary) -> Vec<usize> {
        let (nx, ny) = (self.resolution.nx(), self.resolution.ny());
        match boundary {
            GridBoundary::Bottom => (0..=nx).map(|i| self.node_index(i, 0)).collect(),
            GridBoundary::Right => (0..=ny).map(|j| self.node_index(nx, j)).collect(),
            GridBoundary::Top => (0..=nx).map(|i| self.node_index(i, ny)).collect(),
            GridBoundary::Left => (0..=ny).map(|j| self.node_index(0, j)).collect(),
        }
    }

    fn is_graded(&self, axis: Axis) -> bool {
        self.graded[axis.index()]
    }

    fn mark_graded(&mut self, axis: Axis) {
        self.graded[axis.index()] = true;
    }
}

impl UniformRefinement for QuadMesh {
    /// Split every element into four.
    ///
    /// New nodes sit on the parent's bilinear geometry (edge midpoints and
    /// centres), so graded spacing carries over. Their values are the
    /// bilinear interpolant of the parent's. A new node on the domain
    /// boundary keeps a pin only if both nodes of its parent edge have it;
    /// interior new nodes are free. Children inherit the exact field and
    /// the smoothed-vorticity pin; recovered data is discarded.
    fn refine_uniformly(&mut self) -> Result<(), CapabilityError> {
        let (nx, ny) = (self.resolution.nx(), self.resolution.ny());
        let fine = Resolution2D::new(2 * nx, 2 * ny);
        let (fnx, fny) = (fine.nx(), fine.ny());

        let old = |i: usize, j: usize| &self.nodes[j * (nx + 1) + i];

        let mut nodes = Vec::with_capacity(fine.total_nodes());
        for fj in 0..=fny {
            for fi in 0..=fnx {
                let (i, j) = (fi / 2, fj / 2);
                let mut node = match (fi % 2, fj % 2) {
                    (0, 0) => *old(i, j),
                    (1, 0) => Node::average(&[old(i, j), old(i + 1, j)]),
                    (0, 1) => Node::average(&[old(i, j), old(i, j + 1)]),
                    _ => Node::average(&[old(i, j), old(i + 1, j), old(i, j + 1), old(i + 1, j + 1)]),
                };
                let on_boundary = fi == 0 || fi == fnx || fj == 0 || fj == fny;
                let is_new = fi % 2 == 1 || fj % 2 == 1;
                if is_new && !on_boundary {
                    node.pinned = [false; 2];
                }
                nodes.push(node);
            }
        }

        if nodes.len() != fine.total_nodes() {
            return Err(CapabilityError::Refinement(format!(
                "expected {} nodes, built {}",
                fine.total_nodes(),
                nodes.len()
            )));
        }

        let parents = std::mem::take(&mut self.elements);
        self.resolution = fine;
        self.nodes = nodes;

        let mut elements = Vec::with_capacity(fine.total_elements());
        for fj in 0..fny {
            for fi in 0..fnx {
                let parent = &parents[(fj / 2) * nx + fi / 2];
                elements.push(QuadElement::child_of(
                    parent,
                    self.element_index(fi, fj),
                    self.element_corners(fi, fj),
                ));
            }
        }
        self.elements = elements;

        debug!(
            resolution = %self.resolution,
            n_elements = self.elements.len(),
            "refined mesh uniformly"
        );
        Ok(())
    }
}

//! Mesh nodes.

/// Grid node: position and the two velocity unknowns.
///
/// Transforms move `x` only. A pinned component is held at its value by
/// the flow solve (a Dirichlet condition) and does not count as a degree of
/// freedom.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Node {
    /// Position `[x, y]`
    pub x: [f64; 2],
    /// Velocity `[u, v]`
    pub values: [f64; 2],
    /// Pin flags for `[u, v]`
    pub pinned: [bool; 2],
}

impl Node {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: [x, y],
            ..Self::default()
        }
    }

    #[inline]
    pub fn pin(&mut self, component: usize) {
        self.pinned[component] = true;
    }

    #[inline]
    pub fn is_pinned(&self, component: usize) -> bool {
        self.pinned[component]
    }

    /// Average of nodes, used for new nodes created by refinement.
    ///
    /// Positions and values are averaged; a component stays pinned only if
    /// it is pinned on every parent node.
    pub fn average(parents: &[&Node]) -> Self {
        let w = 1.0 / parents.len() as f64;
        let mut out = Node {
            pinned: [true; 2],
            ..Node::default()
        };
        for p in parents {
            for d in 0..2 {
                out.x[d] += w * p.x[d];
                out.values[d] += w * p.values[d];
                out.pinned[d] &= p.pinned[d];
            }
        }
        out
    }
}

//! Properties of the grading transforms and the resolver.

use gradmesh::config::ChannelParameters;
use gradmesh::error::{ConfigError, GeometryError};
use gradmesh::grading::{self, CoordinateMap, HorizontalSquash, TransformCoefficients, VerticalClustering, resolve};
use gradmesh::mesh::{GridMesh, QuadMesh, UniformRefinement};
use gradmesh::types::{Axis, Bounds2D, Resolution2D};

const TOL: f64 = 1e-10;

fn clustering(sharpness: f64) -> VerticalClustering {
    VerticalClustering::new(TransformCoefficients::new(sharpness, 2.565, 0.0, 5.13).unwrap())
}

#[test]
fn test_vertical_strictly_increasing_and_fixes_ends() {
    for sharpness in [0.5, 2.0, 5.0, 12.0] {
        let map = clustering(sharpness);
        assert!(map.map(0.0).abs() < TOL, "wall moved to {}", map.map(0.0));
        assert!((map.map(5.13) - 5.13).abs() < TOL, "top moved to {}", map.map(5.13));

        let n = 400;
        let mut previous = map.map(0.0);
        for k in 1..=n {
            let y = 5.13 * k as f64 / n as f64;
            let current = map.map(y);
            assert!(
                current > previous,
                "alpha={}: not increasing at y={} ({} after {})",
                sharpness,
                y,
                current,
                previous
            );
            previous = current;
        }
    }
}

#[test]
fn test_vertical_branches_meet_at_blend_height() {
    let map = clustering(5.0);
    let b = map.coefficients().blend_height;
    let exp = map.exponential_branch(b);
    let lin = map.linear_branch(b);
    assert!((exp - lin).abs() < TOL, "value mismatch {} vs {}", exp, lin);

    let eps = 1e-6;
    let below = (map.map(b) - map.map(b - eps)) / eps;
    let above = (map.map(b + eps) - map.map(b)) / eps;
    assert!((below - above).abs() < 1e-4, "slope mismatch {} vs {}", below, above);
}

#[test]
fn test_small_sharpness_near_identity() {
    let map = clustering(1e-6);
    for k in 0..=20 {
        let y = 5.13 * k as f64 / 20.0;
        assert!((map.map(y) - y).abs() < 1e-5, "y={} mapped to {}", y, map.map(y));
    }
}

#[test]
fn test_squash_continuous_and_fixes_bounds() {
    let bounds = Bounds2D::channel(-3.63, 3.63, 5.13);
    let squash = HorizontalSquash::from_layout(&bounds, 50, 44, 2.25).unwrap();
    let (left, right) = squash.junctions();

    assert!((squash.map(-3.63) + 3.63).abs() < TOL);
    assert!((squash.map(3.63) - 3.63).abs() < TOL);
    assert!((squash.map(left) + 2.25).abs() < TOL, "left junction {}", squash.map(left));
    assert!((squash.map(right) - 2.25).abs() < TOL, "right junction {}", squash.map(right));

    let eps = 1e-9;
    for x in [left, right] {
        assert!((squash.map(x - eps) - squash.map(x + eps)).abs() < 1e-7);
    }
}

#[test]
fn test_resolver_idempotent() {
    let params = ChannelParameters::default();
    assert_eq!(resolve(&params).unwrap(), resolve(&params).unwrap());

    let params = params.with_mesh_scaling_factor(1.0);
    let layout = resolve(&params).unwrap();
    assert_eq!(layout.grid.resolution, Resolution2D::new(102, 171));
}

#[test]
fn test_zero_sharpness_rejected() {
    let params = ChannelParameters::default().with_clustering_sharpness(0.0);
    assert!(matches!(
        resolve(&params),
        Err(ConfigError::DegenerateSharpness { .. })
    ));
}

#[test]
fn test_blend_node_maps_identically() {
    // ny = 10 with half in the boundary layer puts grid line 5 at the blend height.
    let layout = resolve(&ChannelParameters::default().with_mesh_scaling_factor(1.0)).unwrap();
    let map = layout.vertical_clustering();
    let b = layout.coefficients.blend_height;
    assert!((map.exponential_branch(b) - map.linear_branch(b)).abs() < TOL);
    assert!((map.map(b) - layout.coefficients.outer_edge()).abs() < TOL);
}

#[test]
fn test_graded_mesh_survives_refinement() {
    let layout = resolve(&ChannelParameters::default()).unwrap();
    let mut mesh = QuadMesh::uniform(layout.grid.resolution, layout.grid.bounds);
    grading::apply_to_mesh(&mut mesh, &layout.vertical_clustering()).unwrap();
    grading::apply_to_mesh(&mut mesh, &layout.horizontal_squash()).unwrap();
    mesh.check_ordering().unwrap();

    let h_before = mesh.h_min();
    mesh.refine_uniformly().unwrap();
    mesh.check_ordering().unwrap();
    assert!((mesh.h_min() - 0.5 * h_before).abs() < 1e-9 * h_before);

    assert_eq!(
        grading::apply_to_mesh(&mut mesh, &layout.vertical_clustering()),
        Err(GeometryError::AlreadyTransformed { axis: Axis::Vertical })
    );
}
